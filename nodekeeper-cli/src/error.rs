//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use nodekeeper::artifact::{ArtifactError, Platform};
use nodekeeper::config::{config_file_path, ConfigFileError};
use nodekeeper::contracts::ContractsError;
use nodekeeper::error::BootstrapError;
use nodekeeper::install::InstallError;
use nodekeeper::registration::RegistrationError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Invalid setting or command-line override
    Config(String),
    /// Configuration file could not be read or written
    ConfigFile(ConfigFileError),
    /// Bootstrap run failed
    Bootstrap(BootstrapError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Bootstrap(BootstrapError::Artifact(ArtifactError::UnsupportedPlatform {
                ..
            })) => {
                eprintln!();
                eprintln!("Published node builds exist for:");
                for platform in Platform::SUPPORTED {
                    eprintln!("  {}", platform);
                }
            }
            CliError::Bootstrap(BootstrapError::Install(InstallError::MissingTool(tool))) => {
                eprintln!();
                eprintln!("Install '{}' and make sure it is on your PATH:", tool);
                eprintln!("  Debian/Ubuntu: sudo apt install {}", tool);
                eprintln!("  macOS:         brew install {}", tool);
            }
            CliError::Bootstrap(BootstrapError::Install(InstallError::DownloadFailure {
                ..
            }))
            | CliError::Bootstrap(BootstrapError::Install(InstallError::MissingExecutable {
                ..
            })) => {
                eprintln!();
                eprintln!("Check that the release exists for your platform:");
                eprintln!("  nodekeeper artifact");
                eprintln!("Pin another release with:");
                eprintln!("  nodekeeper config set node.version <version>");
            }
            CliError::Bootstrap(BootstrapError::Contracts(ContractsError::Fetch { .. }))
            | CliError::Bootstrap(BootstrapError::Network(_)) => {
                eprintln!();
                eprintln!("Common issues:");
                eprintln!("  1. The network is down or the RPC URL is wrong (network.rpc_url)");
                eprintln!("  2. Development networks need an IPv4 address in the RPC URL");
                eprintln!("  3. A firewall blocks port 1010 on the development host");
            }
            CliError::Bootstrap(BootstrapError::Registration(RegistrationError::Failure {
                ..
            })) => {
                eprintln!();
                eprintln!("The node API rejected the registration request.");
                eprintln!("Check the node log and the node.api_url setting.");
            }
            CliError::ConfigFile(ConfigFileError::InvalidValue { .. }) => {
                eprintln!();
                eprintln!("Fix the value in {}", config_file_path().display());
                eprintln!("or reset it with 'nodekeeper config set <key> <value>'.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::Bootstrap(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Bootstrap(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<BootstrapError> for CliError {
    fn from(e: BootstrapError) -> Self {
        CliError::Bootstrap(e)
    }
}
