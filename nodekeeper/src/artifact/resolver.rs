//! Artifact descriptors and the resolver that builds them.

use semver::Version;

use super::platform::{Os, Platform};
use super::ArtifactError;

/// Default location of published node releases.
pub const DEFAULT_RELEASE_BASE_URL: &str = "https://github.com/primev/mev-commit/releases/download";

/// Archive container used for a release artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    TarGz,
    Zip,
}

impl ArchiveFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ArchiveFormat::TarGz => "tar.gz",
            ArchiveFormat::Zip => "zip",
        }
    }
}

/// Everything needed to fetch and run one release build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    binary: String,
    version: Version,
    platform: Platform,
    release_base_url: String,
}

impl ArtifactDescriptor {
    /// Deterministic identifier, e.g. `mev-commit_1.1.0_Linux_x86_64`.
    pub fn identifier(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            self.binary,
            self.version,
            self.platform.os().artifact_name(),
            self.platform.arch().artifact_name()
        )
    }

    pub fn archive_format(&self) -> ArchiveFormat {
        match self.platform.os() {
            Os::Windows => ArchiveFormat::Zip,
            Os::Darwin | Os::Linux => ArchiveFormat::TarGz,
        }
    }

    /// Archive file name as published on the release page.
    pub fn archive_name(&self) -> String {
        format!("{}.{}", self.identifier(), self.archive_format().extension())
    }

    /// File name of the executable inside the archive.
    pub fn executable_name(&self) -> String {
        match self.platform.os() {
            Os::Windows => format!("{}.exe", self.binary),
            Os::Darwin | Os::Linux => self.binary.clone(),
        }
    }

    /// Download URL: `{release_base}/v{version}/{archive}`.
    pub fn download_url(&self) -> String {
        format!(
            "{}/v{}/{}",
            self.release_base_url.trim_end_matches('/'),
            self.version,
            self.archive_name()
        )
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }
}

/// Maps platforms and versions to release artifacts for one binary.
#[derive(Debug, Clone)]
pub struct ArtifactResolver {
    binary: String,
    release_base_url: String,
}

impl ArtifactResolver {
    /// Create a resolver for `binary` using the default release location.
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            release_base_url: DEFAULT_RELEASE_BASE_URL.to_string(),
        }
    }

    /// Override the release location.
    pub fn with_release_base_url(mut self, url: impl Into<String>) -> Self {
        self.release_base_url = url.into();
        self
    }

    /// Resolve the artifact for an already-validated platform.
    pub fn resolve(&self, platform: Platform, version: &Version) -> ArtifactDescriptor {
        ArtifactDescriptor {
            binary: self.binary.clone(),
            version: version.clone(),
            platform,
            release_base_url: self.release_base_url.clone(),
        }
    }

    /// Resolve the artifact from raw OS and architecture names.
    pub fn resolve_for(
        &self,
        os: &str,
        arch: &str,
        version: &Version,
    ) -> Result<ArtifactDescriptor, ArtifactError> {
        let platform = Platform::parse(os, arch)?;
        Ok(self.resolve(platform, version))
    }

    /// Resolve the artifact for the running host.
    pub fn resolve_current(&self, version: &Version) -> Result<ArtifactDescriptor, ArtifactError> {
        let platform = Platform::current()?;
        Ok(self.resolve(platform, version))
    }
}
