//! Progress reporting for a bootstrap run.

use std::process::ExitStatus;

use tracing::{info, warn};

use crate::artifact::ArtifactDescriptor;
use crate::funding::{FundingObserver, NoopObserver, TracingObserver};
use crate::install::{InstalledArtifact, ProgressCallback};
use crate::registration::RegistrationOutcome;

/// Receives bootstrap milestones in addition to funding events.
///
/// All methods default to doing nothing.
pub trait BootstrapObserver: FundingObserver {
    fn artifact_resolved(&self, _artifact: &ArtifactDescriptor) {}

    /// Callback for archive download progress, if wanted.
    fn download_progress(&self) -> Option<ProgressCallback> {
        None
    }

    fn installed(&self, _installed: &InstalledArtifact) {}

    fn node_started(&self, _pid: u32) {}

    fn registered(&self, _outcome: &RegistrationOutcome) {}

    fn node_exited(&self, _status: ExitStatus) {}
}

impl BootstrapObserver for NoopObserver {}

impl BootstrapObserver for TracingObserver {
    fn artifact_resolved(&self, artifact: &ArtifactDescriptor) {
        info!(
            artifact = %artifact.identifier(),
            url = %artifact.download_url(),
            "Resolved node release"
        );
    }

    fn node_started(&self, pid: u32) {
        info!(pid, "Node running, waiting for account funding");
    }

    fn registered(&self, outcome: &RegistrationOutcome) {
        match outcome {
            RegistrationOutcome::Deposited { amount } => {
                info!(%amount, "Bidder deposit registered")
            }
            RegistrationOutcome::Staked { tx_hash, amount } => {
                info!(%tx_hash, %amount, "Provider stake registered")
            }
            RegistrationOutcome::ManualStepRequired { instructions } => {
                warn!("Manual registration required:\n{instructions}")
            }
        }
    }

    fn node_exited(&self, status: ExitStatus) {
        if status.success() {
            info!(%status, "Node exited");
        } else {
            warn!(%status, "Node exited with failure");
        }
    }
}
