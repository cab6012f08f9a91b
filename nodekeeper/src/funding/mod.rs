//! Funding wait for the node's operating account.
//!
//! The node generates its own private key on first start. Before any
//! registration can happen, that account has to hold funds, which arrive
//! from outside (a faucet, an operator transfer). The [`FundingWaiter`]
//! drives this wait as a small state machine:
//!
//! ```text
//! WaitingForKey ──► PollingBalance ──► Funded
//! ```
//!
//! The key file is only ever read here. Balance queries go through
//! [`BalanceSource`]; failures are reported and retried on the next tick.

mod account;
mod balance;
mod events;
mod waiter;

pub use alloy::primitives::{Address, U256};

pub use account::{Account, KeyFileStatus};
pub use balance::{BalanceSource, JsonRpcBalanceClient};
pub use events::{format_ether, FundingEvent, FundingObserver, NoopObserver, TracingObserver};
pub use waiter::{FundingOutcome, FundingState, FundingWaiter, WaitPolicy};

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors from the funding wait.
#[derive(Debug, Error)]
pub enum FundingError {
    /// The key file exists but does not hold a valid secp256k1 key.
    #[error("Invalid private key in {}: {reason}", .path.display())]
    InvalidKey { path: PathBuf, reason: String },

    /// The key file could not be read.
    #[error("Failed to read key file {}: {source}", .path.display())]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The wait policy's deadline passed before the account was funded.
    #[error("Account not funded within {}s", .0.as_secs())]
    Timeout(Duration),

    /// The node exited before its account was funded.
    #[error("Node exited while waiting for funding")]
    NodeExited,
}
