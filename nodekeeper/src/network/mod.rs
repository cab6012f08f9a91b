//! Network endpoints and metadata.
//!
//! A node joins either the production network, whose endpoints are fixed in
//! configuration, or a development network whose metadata service lives on
//! the same host as its RPC endpoint. This module resolves which URLs to
//! query and fetches the network metadata document (`{"version": ...}`).
//!
//! HTTP access goes through [`MetadataClient`] so that callers can be tested
//! without a network.

mod client;
mod endpoints;
mod metadata;

pub use client::{HttpMetadataClient, MetadataClient};
pub use endpoints::{
    extract_ipv4, NetworkEndpoints, NetworkEnvironment, DEV_CONTRACTS_PATH, DEV_METADATA_PATH,
    DEV_METADATA_PORT,
};
pub use metadata::{fetch_metadata, NetworkMetadata};

use thiserror::Error;

/// Errors from network endpoint resolution and metadata fetching.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// The RPC URL has no IPv4 literal to derive development endpoints from.
    #[error("RPC URL '{url}' does not contain an IPv4 address")]
    InvalidRpcUrl { url: String },

    /// The HTTP client could not be built.
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(String),

    /// The endpoint could not be reached.
    #[error("Failed to reach {url}: {reason}")]
    Unreachable { url: String, reason: String },

    /// The request exceeded its timeout.
    #[error("Request to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    /// The endpoint answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    /// The response body was not the expected JSON document.
    #[error("Invalid response from {url}: {reason}")]
    InvalidResponse { url: String, reason: String },
}

/// Result alias for network operations.
pub type NetworkResult<T> = Result<T, NetworkError>;
