//! Terminal progress output for the start command.
//!
//! Every milestone is also forwarded to [`TracingObserver`] so the log file
//! records the same run the user watched.

use std::io::{self, Write};
use std::process::ExitStatus;

use nodekeeper::artifact::ArtifactDescriptor;
use nodekeeper::bootstrap::BootstrapObserver;
use nodekeeper::funding::{format_ether, FundingEvent, FundingObserver, TracingObserver};
use nodekeeper::install::{InstalledArtifact, ProgressCallback};
use nodekeeper::registration::RegistrationOutcome;

/// Prints bootstrap progress to stdout.
#[derive(Debug, Default)]
pub struct ConsoleObserver;

impl ConsoleObserver {
    pub fn new() -> Self {
        Self
    }
}

impl FundingObserver for ConsoleObserver {
    fn on_event(&self, event: &FundingEvent) {
        TracingObserver.on_event(event);

        if let Some(line) = funding_line(event) {
            println!("{}", line);
        }
    }
}

impl BootstrapObserver for ConsoleObserver {
    fn artifact_resolved(&self, artifact: &ArtifactDescriptor) {
        TracingObserver.artifact_resolved(artifact);
        println!("Release:  {}", artifact.identifier());
    }

    fn download_progress(&self) -> Option<ProgressCallback> {
        Some(Box::new(|downloaded, total| {
            if total > 0 {
                print!("\rDownloading... {:>3}%", downloaded * 100 / total);
            } else {
                print!("\rDownloading... {} bytes", downloaded);
            }
            let _ = io::stdout().flush();
        }))
    }

    fn installed(&self, installed: &InstalledArtifact) {
        TracingObserver.installed(installed);
        if installed.downloaded {
            println!();
        }
        println!("Node:     {}", installed.executable.display());
    }

    fn node_started(&self, pid: u32) {
        TracingObserver.node_started(pid);
        println!("Node started (pid {})", pid);
        println!();
    }

    fn registered(&self, outcome: &RegistrationOutcome) {
        TracingObserver.registered(outcome);
        println!();
        match outcome {
            RegistrationOutcome::Deposited { amount } => {
                println!("✓ Bidder deposit of {} ETH registered", format_ether(*amount));
            }
            RegistrationOutcome::Staked { tx_hash, amount } => {
                println!("✓ Provider staked {} ETH", format_ether(*amount));
                println!("  Transaction: {}", tx_hash);
            }
            RegistrationOutcome::ManualStepRequired { instructions } => {
                println!("Provider registration must be completed manually:");
                println!();
                println!("{}", instructions);
            }
        }
        println!();
        println!("Node running. Press Ctrl+C to stop.");
    }

    fn node_exited(&self, status: ExitStatus) {
        TracingObserver.node_exited(status);
        println!("Node exited ({})", status);
    }
}

/// One progress line per funding event, or `None` for events only logged.
fn funding_line(event: &FundingEvent) -> Option<String> {
    match event {
        FundingEvent::WaitingForKey { path } => Some(format!(
            "Waiting for the node to create its key at {}...",
            path.display()
        )),
        FundingEvent::AccountReady { address } => Some(format!(
            "Node account: {}\nSend ETH on the settlement chain to this address to continue.",
            address
        )),
        FundingEvent::Waiting { balance, .. } => Some(format!(
            "Waiting for funds (balance {} ETH)...",
            format_ether(*balance)
        )),
        FundingEvent::QueryFailed { .. } => None,
        FundingEvent::Funded { balance, .. } => {
            Some(format!("✓ Account funded with {} ETH", format_ether(*balance)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodekeeper::funding::{Address, U256};
    use std::path::PathBuf;

    fn address() -> Address {
        Address::repeat_byte(0x11)
    }

    #[test]
    fn test_waiting_line_shows_ether() {
        let line = funding_line(&FundingEvent::Waiting {
            address: address(),
            balance: U256::ZERO,
        })
        .unwrap();
        assert_eq!(line, "Waiting for funds (balance 0.0 ETH)...");
    }

    #[test]
    fn test_query_failures_are_not_printed() {
        let event = FundingEvent::QueryFailed {
            address: address(),
            reason: "connection refused".to_string(),
        };
        assert!(funding_line(&event).is_none());
    }

    #[test]
    fn test_waiting_for_key_names_path() {
        let line = funding_line(&FundingEvent::WaitingForKey {
            path: PathBuf::from("/srv/node/key"),
        })
        .unwrap();
        assert!(line.contains("/srv/node/key"));
    }
}
