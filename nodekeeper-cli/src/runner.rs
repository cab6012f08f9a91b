//! CLI runner for common setup.
//!
//! Encapsulates logging initialization and configuration ownership so
//! command handlers only deal with their own work.

use tracing::info;

use nodekeeper::config::ConfigFile;
use nodekeeper::logging::{init_logging_full, LoggingGuard};

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Effective configuration (file values with command-line overrides)
    config: ConfigFile,
}

impl CliRunner {
    /// Create a runner for an already-merged configuration.
    ///
    /// When stdout is a TTY, stdout logging is disabled and commands print
    /// progress lines instead.
    ///
    /// # Arguments
    ///
    /// * `config` - Effective configuration
    /// * `debug_mode` - When true, enables debug-level logging regardless of RUST_LOG
    pub fn with_config(config: ConfigFile, debug_mode: bool) -> Result<Self, CliError> {
        let log_path = &config.logging.file;
        let log_dir = log_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| ".".into());
        let log_file = log_path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "nodekeeper.log".to_string());

        let stdout_enabled = !atty::is(atty::Stream::Stdout);

        let logging_guard = init_logging_full(&log_dir, &log_file, stdout_enabled, debug_mode)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the effective configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("nodekeeper v{}", nodekeeper::VERSION);
        info!(
            command,
            role = %self.config.node.role,
            environment = %self.config.network.environment,
            "nodekeeper CLI starting"
        );
    }
}
