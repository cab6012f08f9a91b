//! Network metadata document.

use semver::Version;
use serde::Deserialize;

use super::{MetadataClient, NetworkError, NetworkResult};

/// Contents of the network metadata endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NetworkMetadata {
    /// Node release the network currently runs.
    #[serde(deserialize_with = "deserialize_version")]
    pub version: Version,
}

fn deserialize_version<'de, D>(deserializer: D) -> Result<Version, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Version::parse(raw.trim().trim_start_matches('v')).map_err(serde::de::Error::custom)
}

/// Fetch and decode the metadata document at `url`.
pub fn fetch_metadata<C: MetadataClient + ?Sized>(
    client: &C,
    url: &str,
) -> NetworkResult<NetworkMetadata> {
    let document = client.get_json(url)?;
    let metadata: NetworkMetadata =
        serde_json::from_value(document).map_err(|e| NetworkError::InvalidResponse {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    tracing::debug!(url, version = %metadata.version, "Fetched network metadata");
    Ok(metadata)
}
