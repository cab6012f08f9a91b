//! Host platform identification.

use std::fmt;

use super::ArtifactError;

/// Operating systems with published node builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Darwin,
    Linux,
    Windows,
}

impl Os {
    /// Name used in release artifact file names.
    pub fn artifact_name(&self) -> &'static str {
        match self {
            Os::Darwin => "Darwin",
            Os::Linux => "Linux",
            Os::Windows => "Windows",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "darwin" | "macos" => Some(Os::Darwin),
            "linux" => Some(Os::Linux),
            "windows" => Some(Os::Windows),
            _ => None,
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.artifact_name())
    }
}

/// CPU architectures with published node builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    Arm64,
    X86_64,
}

impl Arch {
    /// Name used in release artifact file names.
    pub fn artifact_name(&self) -> &'static str {
        match self {
            Arch::Arm64 => "arm64",
            Arch::X86_64 => "x86_64",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "arm64" | "aarch64" => Some(Arch::Arm64),
            "x86_64" | "amd64" => Some(Arch::X86_64),
            _ => None,
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.artifact_name())
    }
}

/// A supported (OS, architecture) pair.
///
/// Construction is the only place platform support is checked, so holding a
/// `Platform` means a build exists for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
    os: Os,
    arch: Arch,
}

impl Platform {
    /// Every platform a release is published for.
    pub const SUPPORTED: [Platform; 5] = [
        Platform {
            os: Os::Darwin,
            arch: Arch::Arm64,
        },
        Platform {
            os: Os::Darwin,
            arch: Arch::X86_64,
        },
        Platform {
            os: Os::Linux,
            arch: Arch::Arm64,
        },
        Platform {
            os: Os::Linux,
            arch: Arch::X86_64,
        },
        Platform {
            os: Os::Windows,
            arch: Arch::X86_64,
        },
    ];

    /// Create a platform from typed parts, rejecting unsupported pairs.
    pub fn new(os: Os, arch: Arch) -> Result<Self, ArtifactError> {
        let candidate = Platform { os, arch };
        if Self::SUPPORTED.contains(&candidate) {
            Ok(candidate)
        } else {
            Err(ArtifactError::UnsupportedPlatform {
                os: os.to_string(),
                arch: arch.to_string(),
            })
        }
    }

    /// Parse a platform from free-form OS and architecture names.
    ///
    /// Names are case-insensitive and accept the common aliases
    /// (`macos`, `aarch64`, `amd64`).
    pub fn parse(os: &str, arch: &str) -> Result<Self, ArtifactError> {
        let unsupported = || ArtifactError::UnsupportedPlatform {
            os: os.to_string(),
            arch: arch.to_string(),
        };

        let os = Os::from_name(os).ok_or_else(unsupported)?;
        let arch = Arch::from_name(arch).ok_or_else(unsupported)?;
        Self::new(os, arch)
    }

    /// Platform of the running host.
    pub fn current() -> Result<Self, ArtifactError> {
        Self::parse(std::env::consts::OS, std::env::consts::ARCH)
    }

    pub fn os(&self) -> Os {
        self.os
    }

    pub fn arch(&self) -> Arch {
        self.arch
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_supported_pairs() {
        for (os, arch) in [
            ("Darwin", "arm64"),
            ("Darwin", "x86_64"),
            ("Linux", "arm64"),
            ("Linux", "x86_64"),
            ("Windows", "x86_64"),
        ] {
            let platform = Platform::parse(os, arch).unwrap();
            assert_eq!(platform.os().artifact_name(), os);
            assert_eq!(platform.arch().artifact_name(), arch);
        }
    }

    #[test]
    fn test_parse_aliases() {
        let platform = Platform::parse("macos", "aarch64").unwrap();
        assert_eq!(platform.os(), Os::Darwin);
        assert_eq!(platform.arch(), Arch::Arm64);

        let platform = Platform::parse("LINUX", "amd64").unwrap();
        assert_eq!(platform.os(), Os::Linux);
        assert_eq!(platform.arch(), Arch::X86_64);
    }

    #[test]
    fn test_windows_arm64_unsupported() {
        let result = Platform::new(Os::Windows, Arch::Arm64);
        assert_eq!(
            result,
            Err(ArtifactError::UnsupportedPlatform {
                os: "Windows".to_string(),
                arch: "arm64".to_string(),
            })
        );
    }

    #[test]
    fn test_unknown_names_unsupported() {
        for (os, arch) in [
            ("FreeBSD", "x86_64"),
            ("Linux", "riscv64"),
            ("Linux", "i686"),
            ("", ""),
            ("Windows", "arm64"),
        ] {
            let err = Platform::parse(os, arch).unwrap_err();
            assert!(matches!(err, ArtifactError::UnsupportedPlatform { .. }));
        }
    }

    #[test]
    fn test_display() {
        let platform = Platform::parse("linux", "x86_64").unwrap();
        assert_eq!(platform.to_string(), "Linux/x86_64");
    }
}
