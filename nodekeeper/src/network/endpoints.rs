//! Endpoint selection for production and development networks.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use super::{NetworkError, NetworkResult};

/// Port the development metadata service listens on.
pub const DEV_METADATA_PORT: u16 = 1010;

/// Path of the contract address document on the development host.
pub const DEV_CONTRACTS_PATH: &str = "/contracts";

/// Path of the network metadata document on the development host.
pub const DEV_METADATA_PATH: &str = "/meta";

/// Which network the node joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NetworkEnvironment {
    /// Fixed, configured endpoints.
    #[default]
    Production,
    /// Endpoints discovered from the host in the RPC URL.
    Development,
}

impl NetworkEnvironment {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkEnvironment::Production => "production",
            NetworkEnvironment::Development => "development",
        }
    }
}

impl fmt::Display for NetworkEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkEnvironment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Ok(NetworkEnvironment::Production),
            "development" | "dev" => Ok(NetworkEnvironment::Development),
            other => Err(format!(
                "unknown environment '{}', expected production or development",
                other
            )),
        }
    }
}

/// Resolved metadata endpoints for one run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NetworkEndpoints {
    /// Contract address document, if the deployment publishes one.
    pub contracts_url: Option<String>,
    /// Network metadata document (`{"version": ...}`), if available.
    pub metadata_url: Option<String>,
}

impl NetworkEndpoints {
    /// Resolve the endpoints for `environment`.
    ///
    /// Production uses the configured URLs as given (empty means "not
    /// published"). Development ignores them and derives both URLs from the
    /// IPv4 literal in `rpc_url`.
    pub fn resolve(
        environment: NetworkEnvironment,
        rpc_url: &str,
        contracts_url: Option<&str>,
        metadata_url: Option<&str>,
    ) -> NetworkResult<Self> {
        match environment {
            NetworkEnvironment::Production => Ok(Self {
                contracts_url: non_empty(contracts_url),
                metadata_url: non_empty(metadata_url),
            }),
            NetworkEnvironment::Development => {
                let ip = extract_ipv4(rpc_url).ok_or_else(|| NetworkError::InvalidRpcUrl {
                    url: rpc_url.to_string(),
                })?;
                let base = format!("http://{}:{}", ip, DEV_METADATA_PORT);
                Ok(Self {
                    contracts_url: Some(format!("{}{}", base, DEV_CONTRACTS_PATH)),
                    metadata_url: Some(format!("{}{}", base, DEV_METADATA_PATH)),
                })
            }
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn ipv4_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b(\d{1,3})\.(\d{1,3})\.(\d{1,3})\.(\d{1,3})\b").unwrap())
}

/// Extract the first valid IPv4 literal from a URL.
///
/// Dotted quads with an octet above 255, or that sit inside a longer run
/// of digits, are skipped.
pub fn extract_ipv4(url: &str) -> Option<Ipv4Addr> {
    ipv4_pattern()
        .find_iter(url)
        .find_map(|m| m.as_str().parse::<Ipv4Addr>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_ipv4() {
        assert_eq!(
            extract_ipv4("http://34.215.163.180:8545"),
            Some(Ipv4Addr::new(34, 215, 163, 180))
        );
        assert_eq!(
            extract_ipv4("ws://10.0.0.7/ws"),
            Some(Ipv4Addr::new(10, 0, 0, 7))
        );
        assert_eq!(extract_ipv4("https://chainrpc.testnet.example.xyz"), None);
        assert_eq!(extract_ipv4("http://300.1.1.1:8545"), None);
        assert_eq!(extract_ipv4("http://1234.5.6.78:8545"), None);
        assert_eq!(extract_ipv4("http://1.2.3.45678:8545"), None);
    }

    #[test]
    fn test_production_uses_configured_urls() {
        let endpoints = NetworkEndpoints::resolve(
            NetworkEnvironment::Production,
            "https://rpc.example.com",
            Some("https://contracts.example.com"),
            Some("  "),
        )
        .unwrap();

        assert_eq!(
            endpoints.contracts_url.as_deref(),
            Some("https://contracts.example.com")
        );
        assert_eq!(endpoints.metadata_url, None);
    }

    #[test]
    fn test_development_derives_from_rpc_host() {
        let endpoints = NetworkEndpoints::resolve(
            NetworkEnvironment::Development,
            "http://172.29.18.2:8545",
            Some("https://ignored.example.com"),
            None,
        )
        .unwrap();

        assert_eq!(
            endpoints.contracts_url.as_deref(),
            Some("http://172.29.18.2:1010/contracts")
        );
        assert_eq!(
            endpoints.metadata_url.as_deref(),
            Some("http://172.29.18.2:1010/meta")
        );
    }

    #[test]
    fn test_development_requires_ipv4() {
        let err = NetworkEndpoints::resolve(
            NetworkEnvironment::Development,
            "http://localhost:8545",
            None,
            None,
        )
        .unwrap_err();

        assert!(matches!(err, NetworkError::InvalidRpcUrl { .. }));

        let err = NetworkEndpoints::resolve(
            NetworkEnvironment::Development,
            "http://1234.5.6.78:8545",
            None,
            None,
        )
        .unwrap_err();

        assert!(matches!(err, NetworkError::InvalidRpcUrl { .. }));
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!(
            "DEV".parse::<NetworkEnvironment>(),
            Ok(NetworkEnvironment::Development)
        );
        assert_eq!(
            "production".parse::<NetworkEnvironment>(),
            Ok(NetworkEnvironment::Production)
        );
        assert!("staging".parse::<NetworkEnvironment>().is_err());
    }
}
