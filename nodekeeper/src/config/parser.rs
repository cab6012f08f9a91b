//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI values are validated and mapped to
//! struct fields; [`ConfigKey::set`](super::ConfigKey::set) goes through it
//! too.

use std::path::PathBuf;
use std::str::FromStr;

use alloy::primitives::U256;
use ini::Ini;
use semver::Version;

use super::file::ConfigFileError;
use super::keys::ConfigKey;
use super::node::{ProtocolSelection, Role};
use super::settings::ConfigFile;
use crate::network::NetworkEnvironment;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any known keys found in
/// the INI. Unknown sections and keys are ignored.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    for key in ConfigKey::all() {
        let value = ini
            .section(Some(key.section()))
            .and_then(|section| section.get(key.key_name()));
        if let Some(value) = value {
            apply_value(&mut config, *key, value)?;
        }
    }

    Ok(config)
}

/// Validate `raw` for `key` and store it in `config`.
///
/// `config` is left untouched when validation fails.
pub(super) fn apply_value(
    config: &mut ConfigFile,
    key: ConfigKey,
    raw: &str,
) -> Result<(), ConfigFileError> {
    let v = raw.trim();
    let invalid = |reason: &str| ConfigFileError::InvalidValue {
        section: key.section().to_string(),
        key: key.key_name().to_string(),
        value: raw.to_string(),
        reason: reason.to_string(),
    };

    match key {
        ConfigKey::NetworkEnvironment => {
            config.network.environment = NetworkEnvironment::from_str(v).map_err(|e| invalid(&e))?;
        }
        ConfigKey::NetworkRpcUrl => {
            if !has_url_scheme(v) {
                return Err(invalid("must start with http://, https://, ws:// or wss://"));
            }
            config.network.rpc_url = v.to_string();
        }
        ConfigKey::NetworkBootnodes => {
            config.network.bootnodes = split_list(v);
        }
        ConfigKey::NetworkContractsUrl => {
            config.network.contracts_url = optional_string(v);
        }
        ConfigKey::NetworkMetadataUrl => {
            config.network.metadata_url = optional_string(v);
        }
        ConfigKey::NodeRole => {
            config.node.role = Role::from_str(v).map_err(|e| invalid(&e))?;
        }
        ConfigKey::NodeVersion => {
            config.node.version = if v.is_empty() {
                None
            } else {
                Some(
                    Version::parse(v.trim_start_matches('v'))
                        .map_err(|_| invalid("must be a semantic version like 1.1.0"))?,
                )
            };
        }
        ConfigKey::NodeBinaryName => {
            if v.is_empty() {
                return Err(invalid("must not be empty"));
            }
            config.node.binary_name = v.to_string();
        }
        ConfigKey::NodeReleaseUrl => {
            if !has_url_scheme(v) {
                return Err(invalid("must be an http(s) URL"));
            }
            config.node.release_url = v.to_string();
        }
        ConfigKey::NodeInstallDir => {
            if v.is_empty() {
                return Err(invalid("must not be empty"));
            }
            config.node.install_dir = expand_tilde(v);
        }
        ConfigKey::NodeDataDir => {
            if v.is_empty() {
                return Err(invalid("must not be empty"));
            }
            config.node.data_dir = expand_tilde(v);
        }
        ConfigKey::NodeApiUrl => {
            if !has_url_scheme(v) {
                return Err(invalid("must be an http(s) URL"));
            }
            config.node.api_url = v.trim_end_matches('/').to_string();
        }
        ConfigKey::NodeLogFile => {
            config.node.log_file = optional_string(v).map(|p| expand_tilde(&p));
        }
        ConfigKey::NodeExtraArgs => {
            config.node.extra_args = v.split_whitespace().map(str::to_string).collect();
        }
        ConfigKey::NodeShutdownGraceSecs => {
            config.node.shutdown_grace_secs = v
                .parse()
                .map_err(|_| invalid("must be a non-negative integer (seconds)"))?;
        }
        ConfigKey::FundingPollIntervalSecs => {
            config.funding.poll_interval_secs = parse_positive_secs(v).map_err(|e| invalid(e))?;
        }
        ConfigKey::FundingKeyPollIntervalSecs => {
            config.funding.key_poll_interval_secs =
                parse_positive_secs(v).map_err(|e| invalid(e))?;
        }
        ConfigKey::FundingTimeoutSecs => {
            config.funding.timeout_secs = v
                .parse()
                .map_err(|_| invalid("must be a non-negative integer (seconds, 0 = no limit)"))?;
        }
        ConfigKey::RegistrationProtocol => {
            config.registration.protocol =
                ProtocolSelection::from_str(v).map_err(|e| invalid(&e))?;
        }
        ConfigKey::RegistrationDepositAmount => {
            config.registration.deposit_amount = parse_wei(v).map_err(|e| invalid(e))?;
        }
        ConfigKey::RegistrationStakeAmount => {
            config.registration.stake_amount = parse_wei(v).map_err(|e| invalid(e))?;
        }
        ConfigKey::LoggingFile => {
            if v.is_empty() {
                return Err(invalid("must not be empty"));
            }
            config.logging.file = expand_tilde(v);
        }
    }

    Ok(())
}

fn has_url_scheme(value: &str) -> bool {
    ["http://", "https://", "ws://", "wss://"]
        .iter()
        .any(|scheme| value.starts_with(scheme))
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn optional_string(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_positive_secs(value: &str) -> Result<u64, &'static str> {
    match value.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err("must be a positive integer (seconds)"),
    }
}

fn parse_wei(value: &str) -> Result<U256, &'static str> {
    match U256::from_str_radix(value, 10) {
        Ok(amount) if !amount.is_zero() => Ok(amount),
        _ => Err("must be a positive integer amount in wei"),
    }
}

/// Expand a leading `~` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProtocolGeneration;

    fn parse(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let ini = Ini::load_from_str(content).unwrap();
        parse_ini(&ini)
    }

    #[test]
    fn test_empty_ini_is_default() {
        assert_eq!(parse("").unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_parse_full_sections() {
        let config = parse(
            "[network]\n\
             environment = development\n\
             rpc_url = http://34.215.163.180:8545\n\
             bootnodes = /ip4/1.2.3.4/tcp/1/p2p/a, /ip4/5.6.7.8/tcp/1/p2p/b\n\
             [node]\n\
             role = provider\n\
             version = v0.3.0\n\
             extra_args = --nat-addr 1.2.3.4:13522\n\
             [funding]\n\
             poll_interval_secs = 2\n\
             timeout_secs = 300\n\
             [registration]\n\
             protocol = legacy\n\
             stake_amount = 1000000000000000000\n",
        )
        .unwrap();

        assert_eq!(config.network.environment, NetworkEnvironment::Development);
        assert_eq!(config.network.bootnodes.len(), 2);
        assert_eq!(config.node.role, Role::Provider);
        assert_eq!(config.node.version, Some(Version::new(0, 3, 0)));
        assert_eq!(config.node.extra_args, vec!["--nat-addr", "1.2.3.4:13522"]);
        assert_eq!(config.funding.poll_interval_secs, 2);
        assert_eq!(config.funding.timeout_secs, 300);
        assert_eq!(
            config.registration.protocol,
            ProtocolSelection::Fixed(ProtocolGeneration::Legacy)
        );
        assert_eq!(
            config.registration.stake_amount,
            U256::from(1_000_000_000_000_000_000u128)
        );
    }

    #[test]
    fn test_invalid_role() {
        let err = parse("[node]\nrole = validator\n").unwrap_err();
        match err {
            ConfigFileError::InvalidValue {
                section,
                key,
                value,
                ..
            } => {
                assert_eq!(section, "node");
                assert_eq!(key, "role");
                assert_eq!(value, "validator");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_rpc_url() {
        assert!(parse("[network]\nrpc_url = localhost:8545\n").is_err());
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        assert!(parse("[funding]\npoll_interval_secs = 0\n").is_err());
    }

    #[test]
    fn test_empty_contracts_url_disables() {
        let config = parse("[network]\ncontracts_url =\n").unwrap();
        assert!(config.network.contracts_url.is_none());
    }

    #[test]
    fn test_expand_tilde() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand_tilde("~/.mev-commit"), home.join(".mev-commit"));
        assert_eq!(expand_tilde("/var/lib/node"), PathBuf::from("/var/lib/node"));
    }
}
