//! Configuration key access and validation.
//!
//! This module provides a type-safe interface for getting and setting
//! configuration values by `section.key` name. Values are validated by the
//! same parser that reads config.ini, so a value accepted by `config set` is
//! always one the file loader accepts.

use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use super::parser::apply_value;
use super::settings::ConfigFile;

/// Errors that can occur when getting or setting configuration values.
#[derive(Debug, Error)]
pub enum ConfigKeyError {
    /// Unknown configuration key.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    /// Validation failed for the value.
    #[error("Invalid value for {key}: {reason}")]
    ValidationFailed { key: String, reason: String },
}

/// Supported configuration keys.
///
/// Each key maps to a specific field in [`ConfigFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    // Network settings
    NetworkEnvironment,
    NetworkRpcUrl,
    NetworkBootnodes,
    NetworkContractsUrl,
    NetworkMetadataUrl,

    // Node settings
    NodeRole,
    NodeVersion,
    NodeBinaryName,
    NodeReleaseUrl,
    NodeInstallDir,
    NodeDataDir,
    NodeApiUrl,
    NodeLogFile,
    NodeExtraArgs,
    NodeShutdownGraceSecs,

    // Funding settings
    FundingPollIntervalSecs,
    FundingKeyPollIntervalSecs,
    FundingTimeoutSecs,

    // Registration settings
    RegistrationProtocol,
    RegistrationDepositAmount,
    RegistrationStakeAmount,

    // Logging settings
    LoggingFile,
}

const ALL_KEYS: &[ConfigKey] = &[
    ConfigKey::NetworkEnvironment,
    ConfigKey::NetworkRpcUrl,
    ConfigKey::NetworkBootnodes,
    ConfigKey::NetworkContractsUrl,
    ConfigKey::NetworkMetadataUrl,
    ConfigKey::NodeRole,
    ConfigKey::NodeVersion,
    ConfigKey::NodeBinaryName,
    ConfigKey::NodeReleaseUrl,
    ConfigKey::NodeInstallDir,
    ConfigKey::NodeDataDir,
    ConfigKey::NodeApiUrl,
    ConfigKey::NodeLogFile,
    ConfigKey::NodeExtraArgs,
    ConfigKey::NodeShutdownGraceSecs,
    ConfigKey::FundingPollIntervalSecs,
    ConfigKey::FundingKeyPollIntervalSecs,
    ConfigKey::FundingTimeoutSecs,
    ConfigKey::RegistrationProtocol,
    ConfigKey::RegistrationDepositAmount,
    ConfigKey::RegistrationStakeAmount,
    ConfigKey::LoggingFile,
];

impl FromStr for ConfigKey {
    type Err = ConfigKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ALL_KEYS
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigKeyError::UnknownKey(s.to_string()))
    }
}

impl ConfigKey {
    /// Full `section.key` name.
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::NetworkEnvironment => "network.environment",
            ConfigKey::NetworkRpcUrl => "network.rpc_url",
            ConfigKey::NetworkBootnodes => "network.bootnodes",
            ConfigKey::NetworkContractsUrl => "network.contracts_url",
            ConfigKey::NetworkMetadataUrl => "network.metadata_url",
            ConfigKey::NodeRole => "node.role",
            ConfigKey::NodeVersion => "node.version",
            ConfigKey::NodeBinaryName => "node.binary_name",
            ConfigKey::NodeReleaseUrl => "node.release_url",
            ConfigKey::NodeInstallDir => "node.install_dir",
            ConfigKey::NodeDataDir => "node.data_dir",
            ConfigKey::NodeApiUrl => "node.api_url",
            ConfigKey::NodeLogFile => "node.log_file",
            ConfigKey::NodeExtraArgs => "node.extra_args",
            ConfigKey::NodeShutdownGraceSecs => "node.shutdown_grace_secs",
            ConfigKey::FundingPollIntervalSecs => "funding.poll_interval_secs",
            ConfigKey::FundingKeyPollIntervalSecs => "funding.key_poll_interval_secs",
            ConfigKey::FundingTimeoutSecs => "funding.timeout_secs",
            ConfigKey::RegistrationProtocol => "registration.protocol",
            ConfigKey::RegistrationDepositAmount => "registration.deposit_amount",
            ConfigKey::RegistrationStakeAmount => "registration.stake_amount",
            ConfigKey::LoggingFile => "logging.file",
        }
    }

    /// INI section name.
    pub fn section(&self) -> &'static str {
        self.name().split('.').next().unwrap_or_default()
    }

    /// Key name within the section.
    pub fn key_name(&self) -> &'static str {
        self.name().split('.').nth(1).unwrap_or_default()
    }

    /// Current value rendered as it would appear in config.ini.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::NetworkEnvironment => config.network.environment.to_string(),
            ConfigKey::NetworkRpcUrl => config.network.rpc_url.clone(),
            ConfigKey::NetworkBootnodes => config.network.bootnodes.join(","),
            ConfigKey::NetworkContractsUrl => {
                config.network.contracts_url.clone().unwrap_or_default()
            }
            ConfigKey::NetworkMetadataUrl => {
                config.network.metadata_url.clone().unwrap_or_default()
            }
            ConfigKey::NodeRole => config.node.role.to_string(),
            ConfigKey::NodeVersion => config
                .node
                .version
                .as_ref()
                .map(|v| v.to_string())
                .unwrap_or_default(),
            ConfigKey::NodeBinaryName => config.node.binary_name.clone(),
            ConfigKey::NodeReleaseUrl => config.node.release_url.clone(),
            ConfigKey::NodeInstallDir => path_to_display(&config.node.install_dir),
            ConfigKey::NodeDataDir => path_to_display(&config.node.data_dir),
            ConfigKey::NodeApiUrl => config.node.api_url.clone(),
            ConfigKey::NodeLogFile => config
                .node
                .log_file
                .as_deref()
                .map(path_to_display)
                .unwrap_or_default(),
            ConfigKey::NodeExtraArgs => config.node.extra_args.join(" "),
            ConfigKey::NodeShutdownGraceSecs => config.node.shutdown_grace_secs.to_string(),
            ConfigKey::FundingPollIntervalSecs => config.funding.poll_interval_secs.to_string(),
            ConfigKey::FundingKeyPollIntervalSecs => {
                config.funding.key_poll_interval_secs.to_string()
            }
            ConfigKey::FundingTimeoutSecs => config.funding.timeout_secs.to_string(),
            ConfigKey::RegistrationProtocol => config.registration.protocol.to_string(),
            ConfigKey::RegistrationDepositAmount => config.registration.deposit_amount.to_string(),
            ConfigKey::RegistrationStakeAmount => config.registration.stake_amount.to_string(),
            ConfigKey::LoggingFile => path_to_display(&config.logging.file),
        }
    }

    /// Validate and set a value.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigKeyError> {
        apply_value(config, *self, value).map_err(|e| ConfigKeyError::ValidationFailed {
            key: self.name().to_string(),
            reason: e.to_string(),
        })
    }

    /// All supported keys, in config file order.
    pub fn all() -> &'static [ConfigKey] {
        ALL_KEYS
    }
}

fn path_to_display(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Role;

    #[test]
    fn test_config_key_parsing() {
        assert_eq!(
            "network.rpc_url".parse::<ConfigKey>().unwrap(),
            ConfigKey::NetworkRpcUrl
        );
        assert_eq!(
            "FUNDING.TIMEOUT_SECS".parse::<ConfigKey>().unwrap(),
            ConfigKey::FundingTimeoutSecs
        );
        assert!("network.nope".parse::<ConfigKey>().is_err());
    }

    #[test]
    fn test_key_name_parts() {
        let key = ConfigKey::RegistrationDepositAmount;
        assert_eq!(key.section(), "registration");
        assert_eq!(key.key_name(), "deposit_amount");
    }

    #[test]
    fn test_every_key_round_trips_its_name() {
        for key in ConfigKey::all() {
            assert_eq!(key.name().parse::<ConfigKey>().unwrap(), *key);
        }
    }

    #[test]
    fn test_get_value() {
        let config = ConfigFile::default();
        assert_eq!(ConfigKey::NodeRole.get(&config), "bidder");
        assert_eq!(ConfigKey::NodeVersion.get(&config), "");
        assert_eq!(ConfigKey::FundingPollIntervalSecs.get(&config), "5");
    }

    #[test]
    fn test_set_value() {
        let mut config = ConfigFile::default();

        ConfigKey::NodeRole.set(&mut config, "provider").unwrap();
        assert_eq!(config.node.role, Role::Provider);

        ConfigKey::NetworkBootnodes
            .set(&mut config, "/dnsaddr/a.example, /dnsaddr/b.example")
            .unwrap();
        assert_eq!(
            config.network.bootnodes,
            vec!["/dnsaddr/a.example", "/dnsaddr/b.example"]
        );
    }

    #[test]
    fn test_set_invalid_value() {
        let mut config = ConfigFile::default();

        let err = ConfigKey::NodeRole.set(&mut config, "validator").unwrap_err();
        assert!(matches!(err, ConfigKeyError::ValidationFailed { .. }));
        assert_eq!(config.node.role, Role::Bidder);

        assert!(ConfigKey::FundingPollIntervalSecs
            .set(&mut config, "0")
            .is_err());
        assert!(ConfigKey::RegistrationStakeAmount
            .set(&mut config, "ten ether")
            .is_err());
    }
}
