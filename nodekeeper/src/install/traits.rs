//! Trait definitions for installation collaborators.
//!
//! These traits let the installer be tested without network access or
//! external tools.

use std::path::Path;

use crate::artifact::ArchiveFormat;

use super::InstallResult;

/// Progress callback for downloads: `(downloaded, total)` in bytes, with
/// `total` zero when the server did not send a length.
pub type ProgressCallback = Box<dyn Fn(u64, u64) + Send + Sync>;

/// Downloader for release archives.
pub trait ArtifactDownloader: Send + Sync {
    /// Download `url` to `dest`, returning the number of bytes written.
    ///
    /// `dest` is only created once the whole body has been received.
    fn download(&self, url: &str, dest: &Path) -> InstallResult<u64>;

    /// Download with progress reporting.
    fn download_with_progress(
        &self,
        url: &str,
        dest: &Path,
        on_progress: ProgressCallback,
    ) -> InstallResult<u64>;
}

/// Extractor for release archives.
pub trait ArchiveExtractor: Send + Sync {
    /// Extract `archive` into `dest_dir`, which must already exist.
    fn extract(&self, archive: &Path, format: ArchiveFormat, dest_dir: &Path) -> InstallResult<()>;
}
