//! Bidder deposit through the local node API.

use std::time::Duration;

use alloy::primitives::U256;
use reqwest::blocking::Client;
use tracing::{info, warn};

use super::{RegistrationError, RegistrationOutcome, RoleAction};
use crate::funding::Account;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Sends the deposit request to the node API.
///
/// Returns the HTTP status; interpretation is left to the caller.
pub trait DepositClient: Send + Sync {
    fn post(&self, url: &str) -> Result<u16, RegistrationError>;
}

/// Blocking `reqwest` implementation of [`DepositClient`].
#[derive(Clone)]
pub struct HttpDepositClient {
    client: Client,
}

impl std::fmt::Debug for HttpDepositClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpDepositClient").finish_non_exhaustive()
    }
}

impl HttpDepositClient {
    pub fn new() -> Result<Self, RegistrationError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, RegistrationError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RegistrationError::Request {
                url: String::new(),
                reason: format!("failed to create HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }
}

impl DepositClient for HttpDepositClient {
    fn post(&self, url: &str) -> Result<u16, RegistrationError> {
        let response = self
            .client
            .post(url)
            .send()
            .map_err(|e| RegistrationError::Request {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        Ok(response.status().as_u16())
    }
}

/// Deposit for a bidder node: one POST, HTTP 200 or failure.
pub struct BidderDeposit<'a, C: DepositClient + ?Sized> {
    client: &'a C,
    url: String,
    amount: U256,
}

impl<'a, C: DepositClient + ?Sized> BidderDeposit<'a, C> {
    pub fn new(client: &'a C, url: impl Into<String>, amount: U256) -> Self {
        Self {
            client,
            url: url.into(),
            amount,
        }
    }
}

impl<C: DepositClient + ?Sized> RoleAction for BidderDeposit<'_, C> {
    fn describe(&self) -> String {
        format!("bidder deposit via {}", self.url)
    }

    fn execute(&self, account: &Account) -> Result<RegistrationOutcome, RegistrationError> {
        let status = self.client.post(&self.url)?;
        if status != 200 {
            warn!(url = %self.url, status, "Bidder deposit rejected");
            return Err(RegistrationError::Failure {
                url: self.url.clone(),
                status,
            });
        }

        info!(address = %account.address(), amount = %self.amount, "Bidder deposit accepted");
        Ok(RegistrationOutcome::Deposited {
            amount: self.amount,
        })
    }
}
