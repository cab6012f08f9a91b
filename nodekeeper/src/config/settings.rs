//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

use alloy::primitives::U256;
use semver::Version;

use super::node::{ProtocolSelection, Role};
use crate::network::NetworkEnvironment;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Network endpoints
    pub network: NetworkSettings,
    /// Node binary and runtime settings
    pub node: NodeSettings,
    /// Funding wait behavior
    pub funding: FundingSettings,
    /// Role registration settings
    pub registration: RegistrationSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Network configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSettings {
    /// Production uses the URLs below; development derives them from `rpc_url`.
    pub environment: NetworkEnvironment,
    /// Settlement chain RPC endpoint.
    pub rpc_url: String,
    /// Bootnode multiaddrs passed to the node.
    pub bootnodes: Vec<String>,
    /// Contract address document (production only).
    pub contracts_url: Option<String>,
    /// Network metadata document (production only).
    pub metadata_url: Option<String>,
}

/// Node binary configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSettings {
    /// Role the node runs as.
    pub role: Role,
    /// Pinned node release; `None` asks the metadata endpoint.
    pub version: Option<Version>,
    /// Executable name inside release archives.
    pub binary_name: String,
    /// Base URL of published releases.
    pub release_url: String,
    /// Where downloaded releases are unpacked (one subdirectory per version).
    pub install_dir: PathBuf,
    /// Node data directory; the node writes its key file here.
    pub data_dir: PathBuf,
    /// Local node HTTP API.
    pub api_url: String,
    /// Redirect node stdout/stderr to this file instead of inheriting them.
    pub log_file: Option<PathBuf>,
    /// Extra arguments appended verbatim to the node command line.
    pub extra_args: Vec<String>,
    /// Seconds to wait after SIGTERM before killing the node.
    pub shutdown_grace_secs: u64,
}

/// Funding wait configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundingSettings {
    /// Seconds between balance queries.
    pub poll_interval_secs: u64,
    /// Seconds between checks for the node's key file.
    pub key_poll_interval_secs: u64,
    /// Give up after this many seconds; 0 waits forever.
    pub timeout_secs: u64,
}

/// Registration configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationSettings {
    /// Protocol generation, or `auto` to derive it from the node version.
    pub protocol: ProtocolSelection,
    /// Bidder deposit in wei.
    pub deposit_amount: U256,
    /// Provider stake in wei.
    pub stake_amount: U256,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
