//! Configuration file handling for ~/.nodekeeper/config.ini.
//!
//! Loads and saves user configuration with sensible defaults.
//! Settings structs live in [`super::settings`], constants in [`super::defaults`],
//! parsing in [`super::parser`], and serialization in [`super::writer`].

use ini::Ini;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::settings::ConfigFile;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

impl ConfigFile {
    /// Load configuration from the default path (~/.nodekeeper/config.ini).
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load() -> Result<Self, ConfigFileError> {
        let path = config_file_path();
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Save configuration to the default path (~/.nodekeeper/config.ini).
    pub fn save(&self) -> Result<(), ConfigFileError> {
        let path = config_file_path();
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let content = super::writer::to_config_string(self);
        std::fs::write(path, content).map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// Create the default config file if it doesn't exist.
    ///
    /// Returns the path to the config file.
    pub fn ensure_exists() -> Result<PathBuf, ConfigFileError> {
        let path = config_file_path();
        if !path.exists() {
            Self::default().save_to(&path)?;
        }
        Ok(path)
    }
}

/// Get the path to the config directory (~/.nodekeeper).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".nodekeeper")
}

/// Get the path to the config file (~/.nodekeeper/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ProtocolSelection, Role, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_RPC_URL};
    use crate::network::NetworkEnvironment;

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();

        assert_eq!(config.network.environment, NetworkEnvironment::Production);
        assert_eq!(config.network.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(config.node.role, Role::Bidder);
        assert!(config.node.version.is_none());
        assert_eq!(config.funding.poll_interval_secs, DEFAULT_POLL_INTERVAL_SECS);
        assert_eq!(config.funding.timeout_secs, 0);
        assert_eq!(config.registration.protocol, ProtocolSelection::Auto);
    }

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.ini");

        let config = ConfigFile::load_from(&config_path).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.network.environment = NetworkEnvironment::Development;
        config.network.rpc_url = "http://10.1.2.3:8545".to_string();
        config.network.bootnodes = vec!["/ip4/10.1.2.3/tcp/13522/p2p/16Uiu2".to_string()];
        config.node.role = Role::Provider;
        config.node.version = Some(semver::Version::new(0, 3, 1));
        config.node.extra_args = vec!["--log-level".to_string(), "debug".to_string()];
        config.funding.timeout_secs = 600;

        config.save_to(&config_path).unwrap();
        let reloaded = ConfigFile::load_from(&config_path).unwrap();

        assert_eq!(reloaded, config);
    }
}
