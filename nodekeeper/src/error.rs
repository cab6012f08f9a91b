//! Top-level error type for a bootstrap run.

use std::process::ExitStatus;

use thiserror::Error;

use crate::artifact::ArtifactError;
use crate::config::{ConfigFileError, NodeConfigError};
use crate::contracts::ContractsError;
use crate::funding::FundingError;
use crate::install::InstallError;
use crate::network::NetworkError;
use crate::registration::RegistrationError;
use crate::supervisor::SupervisorError;

/// Any failure that aborts a bootstrap run.
///
/// Every variant except [`BootstrapError::Cancelled`] is fatal. Balance
/// query failures never reach this type; the funding wait retries them.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The host platform has no published build.
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    /// Contract addresses could not be fetched or parsed.
    #[error(transparent)]
    Contracts(#[from] ContractsError),

    /// Endpoint resolution or metadata fetching failed.
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// The node configuration is invalid.
    #[error(transparent)]
    NodeConfig(#[from] NodeConfigError),

    /// The configuration file is invalid.
    #[error(transparent)]
    ConfigFile(#[from] ConfigFileError),

    /// No node version is pinned and no metadata endpoint is available.
    #[error("No node version configured and the network publishes no metadata endpoint")]
    UnknownVersion,

    #[error(transparent)]
    Install(#[from] InstallError),

    #[error(transparent)]
    Supervisor(#[from] SupervisorError),

    #[error(transparent)]
    Funding(#[from] FundingError),

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// Shutdown was requested before the node was launched.
    #[error("Shutdown requested before the node was launched")]
    Cancelled,

    /// The node exited on its own with a failure status.
    #[error("Node exited with {0}")]
    NodeFailed(ExitStatus),
}

/// Result alias for bootstrap operations.
pub type BootstrapResult<T> = Result<T, BootstrapError>;
