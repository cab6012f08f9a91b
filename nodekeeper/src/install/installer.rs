//! Release installation into a versioned directory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use super::traits::{ArchiveExtractor, ArtifactDownloader, ProgressCallback};
use super::{InstallError, InstallResult};
use crate::artifact::ArtifactDescriptor;

/// Search depth for the executable inside an extracted archive.
const MAX_SEARCH_DEPTH: usize = 3;

/// An installed node executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledArtifact {
    pub executable: PathBuf,
    /// False when an existing install was reused.
    pub downloaded: bool,
}

/// Installs release artifacts under `{install_dir}/{version}/`.
pub struct ArtifactInstaller<'a> {
    install_dir: PathBuf,
    downloader: &'a dyn ArtifactDownloader,
    extractor: &'a dyn ArchiveExtractor,
}

impl<'a> ArtifactInstaller<'a> {
    pub fn new(
        install_dir: impl Into<PathBuf>,
        downloader: &'a dyn ArtifactDownloader,
        extractor: &'a dyn ArchiveExtractor,
    ) -> Self {
        Self {
            install_dir: install_dir.into(),
            downloader,
            extractor,
        }
    }

    /// Final location of the executable for `artifact`.
    pub fn executable_path(&self, artifact: &ArtifactDescriptor) -> PathBuf {
        self.install_dir
            .join(artifact.version().to_string())
            .join(artifact.executable_name())
    }

    /// Install `artifact`, reusing an existing executable.
    pub fn install(
        &self,
        artifact: &ArtifactDescriptor,
        on_progress: Option<ProgressCallback>,
    ) -> InstallResult<InstalledArtifact> {
        let executable = self.executable_path(artifact);
        if executable.is_file() {
            info!(path = %executable.display(), "Node release already installed");
            return Ok(InstalledArtifact {
                executable,
                downloaded: false,
            });
        }

        let staging = self
            .install_dir
            .join(format!(".staging-{}", artifact.identifier()));
        if staging.exists() {
            fs::remove_dir_all(&staging).map_err(|e| InstallError::io(&staging, e))?;
        }
        let unpacked = staging.join("unpacked");
        fs::create_dir_all(&unpacked).map_err(|e| InstallError::io(&unpacked, e))?;

        let result = self.install_from_staging(artifact, &staging, &unpacked, &executable, on_progress);
        let _ = fs::remove_dir_all(&staging);
        result?;

        info!(
            artifact = %artifact.identifier(),
            path = %executable.display(),
            "Installed node release"
        );
        Ok(InstalledArtifact {
            executable,
            downloaded: true,
        })
    }

    fn install_from_staging(
        &self,
        artifact: &ArtifactDescriptor,
        staging: &Path,
        unpacked: &Path,
        executable: &Path,
        on_progress: Option<ProgressCallback>,
    ) -> InstallResult<()> {
        let archive = staging.join(artifact.archive_name());
        let url = artifact.download_url();
        match on_progress {
            Some(callback) => self.downloader.download_with_progress(&url, &archive, callback)?,
            None => self.downloader.download(&url, &archive)?,
        };

        self.extractor
            .extract(&archive, artifact.archive_format(), unpacked)?;

        let name = artifact.executable_name();
        let found = find_file(unpacked, &name, MAX_SEARCH_DEPTH).ok_or_else(|| {
            InstallError::MissingExecutable {
                name: name.clone(),
                archive: archive.clone(),
            }
        })?;

        if let Some(parent) = executable.parent() {
            fs::create_dir_all(parent).map_err(|e| InstallError::io(parent, e))?;
        }
        fs::rename(&found, executable).map_err(|e| InstallError::io(executable, e))?;
        make_executable(executable)
    }
}

/// Breadth-first search for a file named `name`.
fn find_file(root: &Path, name: &str, max_depth: usize) -> Option<PathBuf> {
    let mut level = vec![root.to_path_buf()];

    for _ in 0..=max_depth {
        let mut next = Vec::new();
        for dir in level {
            let Ok(entries) = fs::read_dir(&dir) else {
                continue;
            };
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    next.push(path);
                } else if entry.file_name() == name {
                    return Some(path);
                }
            }
        }
        level = next;
    }

    None
}

#[cfg(unix)]
fn make_executable(path: &Path) -> InstallResult<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .map_err(|e| InstallError::io(path, e))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> InstallResult<()> {
    Ok(())
}
