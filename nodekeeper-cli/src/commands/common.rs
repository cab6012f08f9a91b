//! Common types and utilities shared across CLI commands.

use clap::Args;
use nodekeeper::config::{ConfigFile, ConfigKey};

use crate::error::CliError;

/// Command-line overrides for config.ini settings.
///
/// Values are validated by the same rules as `config set`, so anything
/// accepted here is a value the file could hold.
#[derive(Debug, Clone, Default, Args)]
pub struct NodeOverrides {
    /// Node role: bidder or provider
    #[arg(long)]
    pub role: Option<String>,

    /// Network environment: production or development
    #[arg(long)]
    pub environment: Option<String>,

    /// Settlement chain RPC endpoint
    #[arg(long)]
    pub rpc_url: Option<String>,

    /// Node release to install instead of the network's current one
    #[arg(long)]
    pub node_version: Option<String>,

    /// Node data directory (the node writes its key here)
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Directory node releases are installed into
    #[arg(long)]
    pub install_dir: Option<String>,

    /// Give up waiting for funds after this many seconds (0 waits forever)
    #[arg(long)]
    pub funding_timeout: Option<String>,
}

impl NodeOverrides {
    fn pairs(&self) -> [(ConfigKey, Option<&str>); 7] {
        [
            (ConfigKey::NodeRole, self.role.as_deref()),
            (ConfigKey::NetworkEnvironment, self.environment.as_deref()),
            (ConfigKey::NetworkRpcUrl, self.rpc_url.as_deref()),
            (ConfigKey::NodeVersion, self.node_version.as_deref()),
            (ConfigKey::NodeDataDir, self.data_dir.as_deref()),
            (ConfigKey::NodeInstallDir, self.install_dir.as_deref()),
            (ConfigKey::FundingTimeoutSecs, self.funding_timeout.as_deref()),
        ]
    }

    /// Apply every given override on top of `config`.
    pub fn apply(&self, config: &mut ConfigFile) -> Result<(), CliError> {
        for (key, value) in self.pairs() {
            if let Some(value) = value {
                key.set(config, value)
                    .map_err(|e| CliError::Config(e.to_string()))?;
            }
        }
        Ok(())
    }
}

/// Load config.ini and apply command-line overrides.
pub fn load_config(overrides: &NodeOverrides) -> Result<ConfigFile, CliError> {
    let mut config = ConfigFile::load()?;
    overrides.apply(&mut config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodekeeper::config::Role;
    use nodekeeper::network::NetworkEnvironment;

    #[test]
    fn test_no_overrides_keeps_config() {
        let mut config = ConfigFile::default();
        NodeOverrides::default().apply(&mut config).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let mut config = ConfigFile::default();
        let overrides = NodeOverrides {
            role: Some("provider".to_string()),
            environment: Some("development".to_string()),
            rpc_url: Some("http://172.29.0.3:8545".to_string()),
            node_version: Some("v0.3.2".to_string()),
            funding_timeout: Some("600".to_string()),
            ..Default::default()
        };

        overrides.apply(&mut config).unwrap();

        assert_eq!(config.node.role, Role::Provider);
        assert_eq!(config.network.environment, NetworkEnvironment::Development);
        assert_eq!(config.network.rpc_url, "http://172.29.0.3:8545");
        assert_eq!(config.node.version, Some(semver::Version::new(0, 3, 2)));
        assert_eq!(config.funding.timeout_secs, 600);
    }

    #[test]
    fn test_invalid_override_is_config_error() {
        let mut config = ConfigFile::default();
        let overrides = NodeOverrides {
            role: Some("validator".to_string()),
            ..Default::default()
        };

        let err = overrides.apply(&mut config).unwrap_err();
        assert!(matches!(err, CliError::Config(msg) if msg.contains("node.role")));
    }
}
