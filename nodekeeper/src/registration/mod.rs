//! Role-specific registration once the node account is funded.
//!
//! Each (role, protocol generation) pair maps to exactly one [`RoleAction`]:
//!
//! | Role     | Legacy                      | Current                      |
//! |----------|-----------------------------|------------------------------|
//! | bidder   | `POST /v1/bidder/prepay`    | `POST /v1/bidder/auto_deposit` |
//! | provider | on-chain `registerAndStake` | manual registration step     |
//!
//! Actions fire once and are never retried; any failure is fatal to the
//! bootstrap run.

mod bidder;
mod dispatcher;
mod provider;
mod request;

pub use bidder::{BidderDeposit, DepositClient, HttpDepositClient};
pub use dispatcher::{select_action, RoleActionDispatcher};
pub use provider::{AlloyStakeSubmitter, ProviderManualRegistration, ProviderStake, StakeSubmitter};
pub use request::{RegistrationRequest, RegistrationTarget};

use alloy::primitives::{B256, U256};
use thiserror::Error;

use crate::funding::Account;

/// A single registration strategy.
pub trait RoleAction {
    /// Short human-readable description, for logs.
    fn describe(&self) -> String;

    /// Perform the action for `account`. Called at most once.
    fn execute(&self, account: &Account) -> Result<RegistrationOutcome, RegistrationError>;
}

/// Successful result of a registration action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// The node API accepted the bidder deposit.
    Deposited { amount: U256 },
    /// The stake transaction was mined successfully.
    Staked { tx_hash: B256, amount: U256 },
    /// Registration must be completed by the operator.
    ManualStepRequired { instructions: String },
}

/// Errors from registration actions.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// The node API answered with a status other than 200.
    #[error("Registration failed: {url} returned HTTP {status}")]
    Failure { url: String, status: u16 },

    /// The node API could not be reached.
    #[error("Registration request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    /// Building, sending or confirming the stake transaction failed.
    #[error("Stake transaction failed: {0}")]
    Transaction(String),

    /// The stake transaction was mined but reverted.
    #[error("Stake transaction {tx_hash} reverted")]
    Reverted { tx_hash: B256 },

    /// On-chain registration needs the provider registry address.
    #[error("Provider registry address is not configured")]
    MissingContracts,
}
