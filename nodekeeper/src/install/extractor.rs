//! Archive extraction through system tools.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use super::traits::ArchiveExtractor;
use super::{InstallError, InstallResult};
use crate::artifact::ArchiveFormat;

/// Extracts archives with `tar` (and `unzip` for zip files on Unix).
///
/// Windows 10+ ships a bsdtar that reads zip archives, so `tar` covers both
/// formats there.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellExtractor;

impl ShellExtractor {
    pub fn new() -> Self {
        Self
    }
}

fn tool_for(format: ArchiveFormat) -> &'static str {
    match format {
        ArchiveFormat::TarGz => "tar",
        ArchiveFormat::Zip if cfg!(windows) => "tar",
        ArchiveFormat::Zip => "unzip",
    }
}

/// Verify the tool needed for `format` can be executed.
pub fn check_required_tools(format: ArchiveFormat) -> InstallResult<()> {
    let tool = tool_for(format);
    let probe = if tool == "unzip" { "-v" } else { "--version" };

    Command::new(tool)
        .arg(probe)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|_| ())
        .map_err(|_| InstallError::MissingTool(tool))
}

impl ArchiveExtractor for ShellExtractor {
    fn extract(&self, archive: &Path, format: ArchiveFormat, dest_dir: &Path) -> InstallResult<()> {
        check_required_tools(format)?;

        let mut command = Command::new(tool_for(format));
        match (format, tool_for(format)) {
            (ArchiveFormat::TarGz, _) => {
                command.arg("-xzf").arg(archive).arg("-C").arg(dest_dir);
            }
            (ArchiveFormat::Zip, "unzip") => {
                command.arg("-o").arg("-q").arg(archive).arg("-d").arg(dest_dir);
            }
            (ArchiveFormat::Zip, _) => {
                command.arg("-xf").arg(archive).arg("-C").arg(dest_dir);
            }
        }

        debug!(archive = %archive.display(), dest = %dest_dir.display(), "Extracting");
        let output = command
            .stdin(Stdio::null())
            .output()
            .map_err(|e| InstallError::ExtractionFailed {
                archive: archive.to_path_buf(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(InstallError::ExtractionFailed {
                archive: archive.to_path_buf(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}
