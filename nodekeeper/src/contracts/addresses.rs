//! The contract address set and its JSON decoding.

use std::str::FromStr;

use alloy::primitives::Address;
use serde_json::Value;

use super::ContractsError;

pub const BLOCK_TRACKER_KEY: &str = "BlockTracker";
pub const BIDDER_REGISTRY_KEY: &str = "BidderRegistry";
pub const PROVIDER_REGISTRY_KEY: &str = "ProviderRegistry";
pub const COMMITMENT_STORE_KEY: &str = "PreConfCommitmentStore";

/// Addresses of the network's core contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractAddresses {
    pub block_tracker: Address,
    pub bidder_registry: Address,
    pub provider_registry: Address,
    pub commitment_store: Address,
}

impl ContractAddresses {
    /// Extract the four addresses from a flat JSON map.
    ///
    /// Extra keys are ignored. `url` only labels errors.
    pub fn from_json(document: &Value, url: &str) -> Result<Self, ContractsError> {
        Ok(Self {
            block_tracker: lookup(document, url, BLOCK_TRACKER_KEY)?,
            bidder_registry: lookup(document, url, BIDDER_REGISTRY_KEY)?,
            provider_registry: lookup(document, url, PROVIDER_REGISTRY_KEY)?,
            commitment_store: lookup(document, url, COMMITMENT_STORE_KEY)?,
        })
    }
}

fn lookup(document: &Value, url: &str, key: &'static str) -> Result<Address, ContractsError> {
    let raw = document
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| ContractsError::MissingKey {
            url: url.to_string(),
            key,
        })?;

    Address::from_str(raw.trim()).map_err(|_| ContractsError::InvalidAddress {
        url: url.to_string(),
        key,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> Value {
        json!({
            "BlockTracker": "0x2eEbF31f5c932D51556E70235FB98bB2237d065c",
            "BidderRegistry": "0x7ffa86fF89489Bca72Fec2a978e33f9870B2Bd25",
            "ProviderRegistry": "0x4FC9b98e1A0Ff10de4c2cf294656854F1d5B207D",
            "PreConfCommitmentStore": "0xCAC68D97a56b19204Dd3dbDC103CB24D47A825A3",
            "Oracle": "0x6856Eb630C79D491886E104D328834643e2C9d58"
        })
    }

    #[test]
    fn test_from_json() {
        let addresses = ContractAddresses::from_json(&document(), "http://c").unwrap();
        assert_eq!(
            addresses.provider_registry,
            Address::from_str("0x4FC9b98e1A0Ff10de4c2cf294656854F1d5B207D").unwrap()
        );
        assert_eq!(
            addresses.commitment_store,
            Address::from_str("0xCAC68D97a56b19204Dd3dbDC103CB24D47A825A3").unwrap()
        );
    }

    #[test]
    fn test_missing_key() {
        let mut doc = document();
        doc.as_object_mut().unwrap().remove("BidderRegistry");

        let err = ContractAddresses::from_json(&doc, "http://c").unwrap_err();
        assert!(matches!(
            err,
            ContractsError::MissingKey {
                key: "BidderRegistry",
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_address() {
        let mut doc = document();
        doc["BlockTracker"] = json!("0x1234");

        let err = ContractAddresses::from_json(&doc, "http://c").unwrap_err();
        assert!(matches!(
            err,
            ContractsError::InvalidAddress {
                key: "BlockTracker",
                ..
            }
        ));
    }

    #[test]
    fn test_non_string_value_is_missing() {
        let mut doc = document();
        doc["ProviderRegistry"] = json!(42);

        let err = ContractAddresses::from_json(&doc, "http://c").unwrap_err();
        assert!(matches!(err, ContractsError::MissingKey { .. }));
    }
}
