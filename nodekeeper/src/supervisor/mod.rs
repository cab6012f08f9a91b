//! Node process supervision.
//!
//! The supervisor is the only owner of the node child process. It spawns the
//! node detached from the terminal's process group, reports its state, and
//! guarantees the node is stopped whenever the orchestrator stops:
//!
//! - on SIGINT/SIGTERM/SIGHUP, through [`install_signal_handler`];
//! - on every return path of the orchestrator, through `Drop`;
//! - on explicit request, through a [`CleanupHandle`].
//!
//! All three paths share one idempotent cleanup routine, so a second call is
//! a no-op and a node that already exited is never signalled.

mod launch;
mod process;
mod shutdown;
mod signals;

pub use launch::LaunchSpec;
pub use process::{
    CleanupHandle, CleanupOutcome, NodeLiveness, NodeState, ProcessSupervisor,
    DEFAULT_SHUTDOWN_GRACE,
};
pub use shutdown::ShutdownSignal;
pub use signals::{handle_termination, install_signal_handler};

use std::path::PathBuf;
use thiserror::Error;

/// Errors from process supervision.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// The node executable does not exist.
    #[error("Node executable not found: {}", .0.display())]
    MissingExecutable(PathBuf),

    /// Spawning the node failed.
    #[error("Failed to launch {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The node output log could not be opened.
    #[error("Failed to open node log {}: {source}", .path.display())]
    NodeLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A node is already running under this supervisor.
    #[error("Node already started (pid {0})")]
    AlreadyStarted(u32),

    /// No node has been started.
    #[error("Node has not been started")]
    NotStarted,

    /// Waiting on the node failed.
    #[error("Failed to wait for node: {0}")]
    Wait(#[source] std::io::Error),

    /// Installing the termination signal handler failed.
    #[error("Failed to install signal handler: {0}")]
    SignalHandler(String),
}
