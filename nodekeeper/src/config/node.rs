//! Frozen launch configuration for one node run.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use semver::Version;
use thiserror::Error;

use super::defaults::{DEFAULT_API_URL, KEY_FILE_NAME};
use crate::contracts::ContractAddresses;

/// Operating role of the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Bidder,
    Provider,
}

impl Role {
    /// Value passed to the node's `--peer-type` flag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Bidder => "bidder",
            Role::Provider => "provider",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bidder" => Ok(Role::Bidder),
            "provider" => Ok(Role::Provider),
            other => Err(format!(
                "unknown role '{}', expected bidder or provider",
                other
            )),
        }
    }
}

/// Generation of the node's registration protocol.
///
/// The two generations register roles differently and the behaviors are not
/// interchangeable, so exactly one is chosen per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolGeneration {
    /// Bidders prepay; providers stake on-chain from the node account.
    Legacy,
    /// Bidders auto-deposit; providers register through an external flow.
    Current,
}

impl ProtocolGeneration {
    /// First node release speaking the current protocol.
    pub const CURRENT_SINCE: Version = Version::new(0, 4, 0);

    /// Generation spoken by a given node release.
    pub fn for_version(version: &Version) -> Self {
        let release = Version::new(version.major, version.minor, version.patch);
        if release < Self::CURRENT_SINCE {
            ProtocolGeneration::Legacy
        } else {
            ProtocolGeneration::Current
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProtocolGeneration::Legacy => "legacy",
            ProtocolGeneration::Current => "current",
        }
    }
}

impl fmt::Display for ProtocolGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configured protocol choice: fixed, or derived from the node version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProtocolSelection {
    #[default]
    Auto,
    Fixed(ProtocolGeneration),
}

impl ProtocolSelection {
    /// Resolve against the node release that will run.
    pub fn resolve(&self, version: &Version) -> ProtocolGeneration {
        match self {
            ProtocolSelection::Auto => ProtocolGeneration::for_version(version),
            ProtocolSelection::Fixed(generation) => *generation,
        }
    }
}

impl fmt::Display for ProtocolSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolSelection::Auto => f.write_str("auto"),
            ProtocolSelection::Fixed(generation) => generation.fmt(f),
        }
    }
}

impl FromStr for ProtocolSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" | "" => Ok(ProtocolSelection::Auto),
            "legacy" => Ok(ProtocolSelection::Fixed(ProtocolGeneration::Legacy)),
            "current" => Ok(ProtocolSelection::Fixed(ProtocolGeneration::Current)),
            other => Err(format!(
                "unknown protocol '{}', expected auto, legacy or current",
                other
            )),
        }
    }
}

/// Errors building a [`NodeConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeConfigError {
    /// A required field was never set.
    #[error("Missing node configuration field: {0}")]
    MissingField(&'static str),

    /// The RPC endpoint is not a usable URL.
    #[error("Invalid RPC URL '{0}'")]
    InvalidRpcUrl(String),

    /// On-chain provider staking needs the provider registry address.
    #[error("Provider staking requires resolved contract addresses (set network.contracts_url)")]
    MissingContracts,
}

/// Launch configuration for one run.
///
/// Built once at startup and never mutated afterwards; components receive it
/// by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    rpc_url: String,
    role: Role,
    bootnodes: Vec<String>,
    contracts: Option<ContractAddresses>,
    executable: PathBuf,
    data_dir: PathBuf,
    key_file: PathBuf,
    api_url: String,
    protocol: ProtocolGeneration,
    extra_args: Vec<String>,
    node_log: Option<PathBuf>,
}

impl NodeConfig {
    pub fn builder() -> NodeConfigBuilder {
        NodeConfigBuilder::default()
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn bootnodes(&self) -> &[String] {
        &self.bootnodes
    }

    pub fn contracts(&self) -> Option<&ContractAddresses> {
        self.contracts.as_ref()
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the private key file the node generates on first start.
    pub fn key_file(&self) -> &Path {
        &self.key_file
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn protocol(&self) -> ProtocolGeneration {
        self.protocol
    }

    pub fn extra_args(&self) -> &[String] {
        &self.extra_args
    }

    /// File receiving node stdout/stderr, if not inherited.
    pub fn node_log(&self) -> Option<&Path> {
        self.node_log.as_deref()
    }
}

/// Builder for [`NodeConfig`].
#[derive(Debug, Default)]
pub struct NodeConfigBuilder {
    rpc_url: Option<String>,
    role: Option<Role>,
    bootnodes: Vec<String>,
    contracts: Option<ContractAddresses>,
    executable: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    api_url: Option<String>,
    protocol: Option<ProtocolGeneration>,
    extra_args: Vec<String>,
    node_log: Option<PathBuf>,
}

impl NodeConfigBuilder {
    pub fn rpc_url(mut self, url: impl Into<String>) -> Self {
        self.rpc_url = Some(url.into());
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn bootnodes(mut self, bootnodes: Vec<String>) -> Self {
        self.bootnodes = bootnodes;
        self
    }

    pub fn contracts(mut self, contracts: Option<ContractAddresses>) -> Self {
        self.contracts = contracts;
        self
    }

    pub fn executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable = Some(path.into());
        self
    }

    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(path.into());
        self
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    pub fn protocol(mut self, protocol: ProtocolGeneration) -> Self {
        self.protocol = Some(protocol);
        self
    }

    pub fn extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    pub fn node_log(mut self, path: Option<PathBuf>) -> Self {
        self.node_log = path;
        self
    }

    /// Validate and freeze the configuration.
    pub fn build(self) -> Result<NodeConfig, NodeConfigError> {
        let rpc_url = self
            .rpc_url
            .map(|u| u.trim().to_string())
            .ok_or(NodeConfigError::MissingField("rpc_url"))?;
        let has_scheme = ["http://", "https://", "ws://", "wss://"]
            .iter()
            .any(|scheme| rpc_url.starts_with(scheme) && rpc_url.len() > scheme.len());
        if !has_scheme {
            return Err(NodeConfigError::InvalidRpcUrl(rpc_url));
        }

        let role = self.role.ok_or(NodeConfigError::MissingField("role"))?;
        let executable = self
            .executable
            .ok_or(NodeConfigError::MissingField("executable"))?;
        let data_dir = self
            .data_dir
            .ok_or(NodeConfigError::MissingField("data_dir"))?;
        let protocol = self.protocol.unwrap_or(ProtocolGeneration::Current);

        if role == Role::Provider
            && protocol == ProtocolGeneration::Legacy
            && self.contracts.is_none()
        {
            return Err(NodeConfigError::MissingContracts);
        }

        Ok(NodeConfig {
            rpc_url,
            role,
            bootnodes: self.bootnodes,
            contracts: self.contracts,
            executable,
            key_file: data_dir.join(KEY_FILE_NAME),
            data_dir,
            api_url: self
                .api_url
                .unwrap_or_else(|| DEFAULT_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            protocol,
            extra_args: self.extra_args,
            node_log: self.node_log,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> NodeConfigBuilder {
        NodeConfig::builder()
            .rpc_url("http://10.0.0.1:8545")
            .role(Role::Bidder)
            .executable("/opt/node/mev-commit")
            .data_dir("/var/lib/node")
    }

    #[test]
    fn test_role_parse_and_display() {
        assert_eq!("Provider".parse::<Role>(), Ok(Role::Provider));
        assert_eq!(Role::Bidder.to_string(), "bidder");
        assert!("relay".parse::<Role>().is_err());
    }

    #[test]
    fn test_protocol_for_version() {
        assert_eq!(
            ProtocolGeneration::for_version(&Version::new(0, 3, 9)),
            ProtocolGeneration::Legacy
        );
        assert_eq!(
            ProtocolGeneration::for_version(&Version::new(0, 4, 0)),
            ProtocolGeneration::Current
        );
        assert_eq!(
            ProtocolGeneration::for_version(&Version::parse("0.4.0-rc1").unwrap()),
            ProtocolGeneration::Current
        );
        assert_eq!(
            ProtocolGeneration::for_version(&Version::new(1, 1, 0)),
            ProtocolGeneration::Current
        );
    }

    #[test]
    fn test_protocol_selection() {
        let legacy = Version::new(0, 2, 0);
        assert_eq!(
            ProtocolSelection::Auto.resolve(&legacy),
            ProtocolGeneration::Legacy
        );
        assert_eq!(
            ProtocolSelection::Fixed(ProtocolGeneration::Current).resolve(&legacy),
            ProtocolGeneration::Current
        );
        assert_eq!("".parse::<ProtocolSelection>(), Ok(ProtocolSelection::Auto));
        assert_eq!(ProtocolSelection::Auto.to_string(), "auto");
    }

    #[test]
    fn test_build_defaults() {
        let config = base().build().unwrap();

        assert_eq!(config.key_file(), Path::new("/var/lib/node/key"));
        assert_eq!(config.api_url(), DEFAULT_API_URL);
        assert_eq!(config.protocol(), ProtocolGeneration::Current);
        assert!(config.contracts().is_none());
        assert!(config.node_log().is_none());
    }

    #[test]
    fn test_build_rejects_bad_rpc_url() {
        let err = base().rpc_url("10.0.0.1:8545").build().unwrap_err();
        assert_eq!(err, NodeConfigError::InvalidRpcUrl("10.0.0.1:8545".to_string()));

        let err = base().rpc_url("http://").build().unwrap_err();
        assert!(matches!(err, NodeConfigError::InvalidRpcUrl(_)));
    }

    #[test]
    fn test_build_requires_fields() {
        let err = NodeConfig::builder()
            .rpc_url("http://10.0.0.1:8545")
            .build()
            .unwrap_err();
        assert_eq!(err, NodeConfigError::MissingField("role"));
    }

    #[test]
    fn test_legacy_provider_requires_contracts() {
        let err = base()
            .role(Role::Provider)
            .protocol(ProtocolGeneration::Legacy)
            .build()
            .unwrap_err();
        assert_eq!(err, NodeConfigError::MissingContracts);

        // The current generation registers providers externally.
        assert!(base()
            .role(Role::Provider)
            .protocol(ProtocolGeneration::Current)
            .build()
            .is_ok());
    }

    #[test]
    fn test_api_url_trailing_slash_trimmed() {
        let config = base().api_url("http://127.0.0.1:13523/").build().unwrap();
        assert_eq!(config.api_url(), "http://127.0.0.1:13523");
    }
}
