//! Platform-specific release artifact resolution.
//!
//! Maps an (OS, architecture, version) triple to the prebuilt node release
//! that runs on it. Resolution is a pure function: an unknown platform is an
//! error, never a fallback to some "close enough" build.
//!
//! # Example
//!
//! ```
//! use nodekeeper::artifact::{ArtifactResolver, Platform};
//! use semver::Version;
//!
//! let resolver = ArtifactResolver::new("mev-commit");
//! let platform = Platform::parse("Linux", "x86_64").unwrap();
//! let artifact = resolver.resolve(platform, &Version::new(1, 1, 0));
//!
//! assert_eq!(artifact.identifier(), "mev-commit_1.1.0_Linux_x86_64");
//! ```

mod platform;
mod resolver;

pub use platform::{Arch, Os, Platform};
pub use resolver::{ArchiveFormat, ArtifactDescriptor, ArtifactResolver, DEFAULT_RELEASE_BASE_URL};

use thiserror::Error;

/// Errors from artifact resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArtifactError {
    /// The (OS, architecture) pair has no published build.
    #[error("Unsupported platform: {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },
}
