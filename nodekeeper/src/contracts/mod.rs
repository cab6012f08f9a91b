//! Contract address resolution.
//!
//! Each network publishes the addresses of its core contracts as a flat JSON
//! map. The resolver fetches that document once and hands the result out as
//! an immutable [`ContractAddresses`] value, which then becomes part of the
//! node's launch configuration.

mod addresses;
mod resolver;

pub use addresses::{
    ContractAddresses, BIDDER_REGISTRY_KEY, BLOCK_TRACKER_KEY, COMMITMENT_STORE_KEY,
    PROVIDER_REGISTRY_KEY,
};
pub use resolver::ContractAddressResolver;

use thiserror::Error;

use crate::network::NetworkError;

/// Errors from contract address resolution.
#[derive(Debug, Error)]
pub enum ContractsError {
    /// The address document could not be fetched.
    #[error("Failed to fetch contract addresses from {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: NetworkError,
    },

    /// A required key is absent from the document.
    #[error("Contract address document at {url} has no '{key}' entry")]
    MissingKey { url: String, key: &'static str },

    /// A key is present but its value is not an address.
    #[error("Invalid address for '{key}' at {url}: '{value}'")]
    InvalidAddress {
        url: String,
        key: &'static str,
        value: String,
    },
}
