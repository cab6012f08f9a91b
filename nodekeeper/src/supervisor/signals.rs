//! Termination signal wiring.

use tracing::{info, warn};

use super::process::{CleanupHandle, CleanupOutcome};
use super::shutdown::ShutdownSignal;
use super::SupervisorError;

/// Install the process-wide handler for SIGINT, SIGTERM and SIGHUP.
///
/// The handler stops the node first and only then raises `shutdown`, so by
/// the time the orchestrator observes the signal the child is already gone.
/// Can only be installed once per process.
pub fn install_signal_handler(
    cleanup: CleanupHandle,
    shutdown: ShutdownSignal,
) -> Result<(), SupervisorError> {
    ctrlc::set_handler(move || handle_termination(&cleanup, &shutdown))
        .map_err(|e| SupervisorError::SignalHandler(e.to_string()))
}

/// Body of the signal handler: stop the node, then raise `shutdown`.
pub fn handle_termination(cleanup: &CleanupHandle, shutdown: &ShutdownSignal) {
    if shutdown.is_triggered() {
        warn!("Shutdown already in progress");
    } else {
        info!("Termination signal received, stopping node");
    }

    match cleanup.run() {
        CleanupOutcome::Stopped { pid, forced: true } => {
            warn!(pid, "Node did not exit within the grace period and was killed")
        }
        CleanupOutcome::Stopped { pid, forced: false } => info!(pid, "Node stopped"),
        CleanupOutcome::LaunchCancelled => info!("Node launch cancelled"),
        CleanupOutcome::AlreadyExited | CleanupOutcome::NotStarted => {}
    }

    shutdown.trigger();
}
