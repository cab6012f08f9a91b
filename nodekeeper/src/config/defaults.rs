//! Default values and constants for all configuration settings.
//!
//! Contains all `DEFAULT_*` constants and the `ConfigFile::default()`
//! implementation.

use std::path::PathBuf;

use alloy::primitives::U256;

use super::file::config_directory;
use super::node::{ProtocolSelection, Role};
use super::settings::*;
use crate::artifact::DEFAULT_RELEASE_BASE_URL;
use crate::network::NetworkEnvironment;

// =============================================================================
// Network
// =============================================================================

/// Settlement chain RPC endpoint of the public testnet.
pub const DEFAULT_RPC_URL: &str = "https://chainrpc.testnet.mev-commit.xyz";

/// Bootnode of the public testnet.
pub const DEFAULT_BOOTNODE: &str = "/dnsaddr/bootnode.testnet.mev-commit.xyz";

/// Contract address document of the public testnet.
pub const DEFAULT_CONTRACTS_URL: &str = "https://contracts.testnet.mev-commit.xyz/contracts";

/// Network metadata document of the public testnet.
pub const DEFAULT_METADATA_URL: &str = "https://contracts.testnet.mev-commit.xyz/meta";

// =============================================================================
// Node
// =============================================================================

/// Executable name inside release archives.
pub const DEFAULT_BINARY_NAME: &str = "mev-commit";

/// Local node HTTP API.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:13523";

/// Name of the key file the node writes into its data directory.
pub const KEY_FILE_NAME: &str = "key";

/// Seconds between SIGTERM and SIGKILL when stopping the node.
pub const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 10;

// =============================================================================
// Funding
// =============================================================================

/// Seconds between balance queries.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Seconds between key file checks.
pub const DEFAULT_KEY_POLL_INTERVAL_SECS: u64 = 1;

/// Funding timeout; 0 means wait forever.
pub const DEFAULT_FUNDING_TIMEOUT_SECS: u64 = 0;

// =============================================================================
// Registration
// =============================================================================

/// Bidder deposit: 10 ETH in wei.
pub const DEFAULT_DEPOSIT_AMOUNT_WEI: u128 = 10_000_000_000_000_000_000;

/// Provider stake: 10 ETH in wei.
pub const DEFAULT_STAKE_AMOUNT_WEI: u128 = 10_000_000_000_000_000_000;

// =============================================================================
// Paths
// =============================================================================

/// Default install directory for node releases (~/.nodekeeper/bin).
pub fn default_install_dir() -> PathBuf {
    config_directory().join("bin")
}

/// Default node data directory (~/.mev-commit).
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".mev-commit")
}

/// Default log file (~/.nodekeeper/nodekeeper.log).
pub fn default_log_file() -> PathBuf {
    config_directory().join("nodekeeper.log")
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            network: NetworkSettings {
                environment: NetworkEnvironment::Production,
                rpc_url: DEFAULT_RPC_URL.to_string(),
                bootnodes: vec![DEFAULT_BOOTNODE.to_string()],
                contracts_url: Some(DEFAULT_CONTRACTS_URL.to_string()),
                metadata_url: Some(DEFAULT_METADATA_URL.to_string()),
            },
            node: NodeSettings {
                role: Role::Bidder,
                version: None,
                binary_name: DEFAULT_BINARY_NAME.to_string(),
                release_url: DEFAULT_RELEASE_BASE_URL.to_string(),
                install_dir: default_install_dir(),
                data_dir: default_data_dir(),
                api_url: DEFAULT_API_URL.to_string(),
                log_file: None,
                extra_args: Vec::new(),
                shutdown_grace_secs: DEFAULT_SHUTDOWN_GRACE_SECS,
            },
            funding: FundingSettings {
                poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
                key_poll_interval_secs: DEFAULT_KEY_POLL_INTERVAL_SECS,
                timeout_secs: DEFAULT_FUNDING_TIMEOUT_SECS,
            },
            registration: RegistrationSettings {
                protocol: ProtocolSelection::Auto,
                deposit_amount: U256::from(DEFAULT_DEPOSIT_AMOUNT_WEI),
                stake_amount: U256::from(DEFAULT_STAKE_AMOUNT_WEI),
            },
            logging: LoggingSettings {
                file: default_log_file(),
            },
        }
    }
}
