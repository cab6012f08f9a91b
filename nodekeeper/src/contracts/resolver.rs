//! Fetches the contract address document for a network.

use tracing::info;

use super::{ContractAddresses, ContractsError};
use crate::network::MetadataClient;

/// Resolves [`ContractAddresses`] from a network's address document.
pub struct ContractAddressResolver<'a, C: MetadataClient + ?Sized> {
    client: &'a C,
}

impl<'a, C: MetadataClient + ?Sized> ContractAddressResolver<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Fetch the document at `url` and extract the four contract addresses.
    pub fn resolve(&self, url: &str) -> Result<ContractAddresses, ContractsError> {
        let document = self
            .client
            .get_json(url)
            .map_err(|source| ContractsError::Fetch {
                url: url.to_string(),
                source,
            })?;

        let addresses = ContractAddresses::from_json(&document, url)?;

        info!(
            url,
            block_tracker = %addresses.block_tracker,
            bidder_registry = %addresses.bidder_registry,
            provider_registry = %addresses.provider_registry,
            commitment_store = %addresses.commitment_store,
            "Resolved contract addresses"
        );

        Ok(addresses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{NetworkError, NetworkResult};
    use serde_json::{json, Value};
    use std::sync::Mutex;

    struct MockClient {
        response: Mutex<Option<NetworkResult<Value>>>,
        requested: Mutex<Vec<String>>,
    }

    impl MockClient {
        fn returning(response: NetworkResult<Value>) -> Self {
            Self {
                response: Mutex::new(Some(response)),
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    impl MetadataClient for MockClient {
        fn get_json(&self, url: &str) -> NetworkResult<Value> {
            self.requested.lock().unwrap().push(url.to_string());
            self.response
                .lock()
                .unwrap()
                .take()
                .expect("mock called more than once")
        }
    }

    #[test]
    fn test_resolve_success() {
        let client = MockClient::returning(Ok(json!({
            "BlockTracker": "0x2eEbF31f5c932D51556E70235FB98bB2237d065c",
            "BidderRegistry": "0x7ffa86fF89489Bca72Fec2a978e33f9870B2Bd25",
            "ProviderRegistry": "0x4FC9b98e1A0Ff10de4c2cf294656854F1d5B207D",
            "PreConfCommitmentStore": "0xCAC68D97a56b19204Dd3dbDC103CB24D47A825A3"
        })));

        let resolver = ContractAddressResolver::new(&client);
        let addresses = resolver.resolve("http://10.0.0.1:1010/contracts").unwrap();

        assert_eq!(
            addresses.block_tracker.to_string(),
            "0x2eEbF31f5c932D51556E70235FB98bB2237d065c"
        );
        assert_eq!(
            client.requested.lock().unwrap().as_slice(),
            ["http://10.0.0.1:1010/contracts"]
        );
    }

    #[test]
    fn test_resolve_unreachable() {
        let client = MockClient::returning(Err(NetworkError::Unreachable {
            url: "http://c".to_string(),
            reason: "connection refused".to_string(),
        }));

        let err = ContractAddressResolver::new(&client)
            .resolve("http://c")
            .unwrap_err();

        assert!(matches!(err, ContractsError::Fetch { .. }));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_resolve_missing_key() {
        let client = MockClient::returning(Ok(json!({})));

        let err = ContractAddressResolver::new(&client)
            .resolve("http://c")
            .unwrap_err();

        assert!(matches!(err, ContractsError::MissingKey { .. }));
    }
}
