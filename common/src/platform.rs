//! Host platform model.
//!
//! The set of supported hosts is closed: every per-platform table in the
//! workspace matches on [`Platform`] without a wildcard arm, so adding a
//! variant here forces each table to be extended.

use std::fmt;
use thiserror::Error;

/// A supported host platform.
///
/// Detect it once with [`Platform::detect`] and pass the value to every
/// component that needs it.
///
/// # Examples
///
/// ```
/// use stagehand_common::platform::Platform;
///
/// let platform = Platform::from_os_arch("macos", "aarch64").expect("supported");
/// assert_eq!(platform, Platform::MacOsArm64);
/// assert_eq!(platform.label(), "macOS");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// 64-bit x86 Linux.
    Linux,
    /// Intel macOS.
    MacOsX86_64,
    /// Apple silicon macOS.
    MacOsArm64,
    /// 64-bit x86 Windows.
    Windows,
}

/// Raised when the host cannot be mapped onto a [`Platform`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported platform: os \"{os}\", arch \"{arch}\"")]
pub struct UnsupportedPlatform {
    /// The operating system reported by the host.
    pub os: String,
    /// The CPU architecture reported by the host.
    pub arch: String,
}

impl Platform {
    /// Every supported platform, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::Linux,
        Self::MacOsX86_64,
        Self::MacOsArm64,
        Self::Windows,
    ];

    /// Classify the host this process runs on.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedPlatform`] when the compile-time target OS and
    /// architecture are outside the supported set.
    pub fn detect() -> Result<Self, UnsupportedPlatform> {
        Self::from_os_arch(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Classify an OS/architecture pair as reported by
    /// [`std::env::consts`].
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedPlatform`] for any pair outside the supported set.
    pub fn from_os_arch(os: &str, arch: &str) -> Result<Self, UnsupportedPlatform> {
        match (os, arch) {
            ("linux", "x86_64") => Ok(Self::Linux),
            ("macos", "x86_64") => Ok(Self::MacOsX86_64),
            ("macos", "aarch64") => Ok(Self::MacOsArm64),
            ("windows", "x86_64") => Ok(Self::Windows),
            _ => Err(UnsupportedPlatform {
                os: os.to_owned(),
                arch: arch.to_owned(),
            }),
        }
    }

    /// The label written into hash manifests.
    ///
    /// Both macOS variants share one label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::MacOsX86_64 | Self::MacOsArm64 => "macOS",
            Self::Windows => "windows",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Linux => "linux-x86_64",
            Self::MacOsX86_64 => "macos-x86_64",
            Self::MacOsArm64 => "macos-arm64",
            Self::Windows => "windows-x86_64",
        };
        f.write_str(name)
    }
}
