//! Funding progress events.

use std::path::PathBuf;

use alloy::primitives::{utils, Address, U256};
use tracing::{info, warn};

/// Progress of a funding wait, reported once per state change or poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FundingEvent {
    /// The node has not written its key yet. Reported once.
    WaitingForKey { path: PathBuf },
    /// The key was read and the account address derived.
    AccountReady { address: Address },
    /// A poll observed a zero balance.
    Waiting { address: Address, balance: U256 },
    /// A balance query failed; it will be retried on the next tick.
    QueryFailed { address: Address, reason: String },
    /// A poll observed a positive balance. Always the last event.
    Funded { address: Address, balance: U256 },
}

/// Receives [`FundingEvent`]s as the wait progresses.
pub trait FundingObserver {
    fn on_event(&self, event: &FundingEvent);
}

impl<F> FundingObserver for F
where
    F: Fn(&FundingEvent),
{
    fn on_event(&self, event: &FundingEvent) {
        self(event)
    }
}

/// Discards all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl FundingObserver for NoopObserver {
    fn on_event(&self, _event: &FundingEvent) {}
}

/// Writes events to the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl FundingObserver for TracingObserver {
    fn on_event(&self, event: &FundingEvent) {
        match event {
            FundingEvent::WaitingForKey { path } => {
                info!(path = %path.display(), "Waiting for node to write its key")
            }
            FundingEvent::AccountReady { address } => {
                info!(%address, "Node account ready, waiting for funds")
            }
            FundingEvent::Waiting { address, balance } => info!(
                %address,
                balance_eth = %format_ether(*balance),
                "Account not funded yet"
            ),
            FundingEvent::QueryFailed { address, reason } => {
                warn!(%address, reason = %reason, "Balance query failed, will retry")
            }
            FundingEvent::Funded { address, balance } => info!(
                %address,
                balance_eth = %format_ether(*balance),
                "Account funded"
            ),
        }
    }
}

/// Format a wei amount as ether, without trailing zeros.
///
/// `format_ether(U256::from(5))` is `"0.000000000000000005"`; one ether is
/// `"1.0"`.
pub fn format_ether(wei: U256) -> String {
    let formatted = utils::format_ether(wei);
    match formatted.split_once('.') {
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                format!("{whole}.0")
            } else {
                format!("{whole}.{fraction}")
            }
        }
        None => formatted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_format_ether() {
        assert_eq!(format_ether(U256::ZERO), "0.0");
        assert_eq!(format_ether(U256::from(5)), "0.000000000000000005");
        assert_eq!(format_ether(U256::from(10u128.pow(18))), "1.0");
        assert_eq!(format_ether(U256::from(15 * 10u128.pow(17))), "1.5");
    }

    #[test]
    fn test_closure_observer() {
        let seen = RefCell::new(Vec::new());
        let observer = |event: &FundingEvent| seen.borrow_mut().push(event.clone());

        observer.on_event(&FundingEvent::AccountReady {
            address: Address::ZERO,
        });
        assert_eq!(seen.borrow().len(), 1);
    }
}
