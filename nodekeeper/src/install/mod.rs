//! Node release installation.
//!
//! Downloads the release archive an [`ArtifactDescriptor`] points at,
//! extracts it, and places the node executable at
//! `{install_dir}/{version}/{executable}`. An executable already present at
//! that path is reused without touching the network.
//!
//! # Architecture
//!
//! - [`ArtifactDownloader`] - fetches an archive to a local file
//! - [`ArchiveExtractor`] - unpacks an archive into a directory
//! - [`ArtifactInstaller`] - drives both and locates the executable
//!
//! [`ArtifactDescriptor`]: crate::artifact::ArtifactDescriptor

mod download;
mod extractor;
mod installer;
mod traits;

pub use download::HttpDownloader;
pub use extractor::{check_required_tools, ShellExtractor};
pub use installer::{ArtifactInstaller, InstalledArtifact};
pub use traits::{ArchiveExtractor, ArtifactDownloader, ProgressCallback};

use std::path::PathBuf;

use thiserror::Error;

/// Errors from installing a node release.
#[derive(Debug, Error)]
pub enum InstallError {
    /// The archive could not be downloaded.
    #[error("Failed to download {url}: {reason}")]
    DownloadFailure { url: String, reason: String },

    /// Extraction tool missing or failed.
    #[error("Failed to extract {}: {reason}", .archive.display())]
    ExtractionFailed { archive: PathBuf, reason: String },

    /// A required external tool is not installed.
    #[error("Required tool '{0}' not found in PATH")]
    MissingTool(&'static str),

    /// The archive did not contain the expected executable.
    #[error("Executable {name} not found in {}", .archive.display())]
    MissingExecutable { name: String, archive: PathBuf },

    /// Filesystem operation failed.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result alias for install operations.
pub type InstallResult<T> = Result<T, InstallError>;

impl InstallError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
