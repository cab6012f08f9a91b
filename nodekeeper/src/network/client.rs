//! HTTP client for JSON metadata documents.

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;

use super::{NetworkError, NetworkResult};

/// Default HTTP request timeout (30 seconds).
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fetches JSON documents from metadata endpoints.
///
/// This trait abstracts HTTP fetching to enable testing without network access.
pub trait MetadataClient: Send + Sync {
    /// Fetch and parse the JSON document at `url`.
    fn get_json(&self, url: &str) -> NetworkResult<Value>;
}

/// Blocking `reqwest` implementation of [`MetadataClient`].
#[derive(Clone)]
pub struct HttpMetadataClient {
    client: Client,
    timeout: Duration,
}

impl std::fmt::Debug for HttpMetadataClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpMetadataClient")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HttpMetadataClient {
    /// Create a client with the default timeout.
    pub fn new() -> NetworkResult<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> NetworkResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("nodekeeper/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| NetworkError::ClientBuild(e.to_string()))?;

        Ok(Self { client, timeout })
    }
}

impl MetadataClient for HttpMetadataClient {
    fn get_json(&self, url: &str) -> NetworkResult<Value> {
        let response = self.client.get(url).send().map_err(|e| {
            if e.is_timeout() {
                NetworkError::Timeout {
                    url: url.to_string(),
                    timeout_secs: self.timeout.as_secs(),
                }
            } else {
                NetworkError::Unreachable {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .map_err(|e| NetworkError::InvalidResponse {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = HttpMetadataClient::new().unwrap();
        assert_eq!(client.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_client_with_timeout() {
        let client = HttpMetadataClient::with_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(client.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_unreachable_endpoint() {
        let client = HttpMetadataClient::with_timeout(Duration::from_secs(2)).unwrap();
        // Port 9 (discard) on localhost is closed on any sane test host.
        let err = client.get_json("http://127.0.0.1:9/meta").unwrap_err();
        assert!(matches!(
            err,
            NetworkError::Unreachable { .. } | NetworkError::Timeout { .. }
        ));
    }
}
