//! Release version newtype for provisioned tools.
//!
//! The version is opaque: it is spliced into download URLs and install
//! directory names but never parsed into components. Validation only rejects
//! strings that would be unsafe as a single path segment.

use std::fmt;
use thiserror::Error;

/// Rejection reason for a malformed version string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid artifact version \"{value}\": {reason}")]
pub struct InvalidVersion {
    /// The rejected input.
    pub value: String,
    /// Description of the validation failure.
    pub reason: String,
}

/// A validated tool release identifier (e.g. `27.0`, `23.2.1`, `28.0rc1`).
///
/// # Examples
///
/// ```
/// use stagehand_installer::version::ArtifactVersion;
///
/// let version: ArtifactVersion = "27.0".try_into().expect("valid version");
/// assert_eq!(version.as_str(), "27.0");
/// assert!(ArtifactVersion::try_from("../27.0").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactVersion(String);

fn is_valid_version_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '+')
}

impl ArtifactVersion {
    /// Return the version as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<&str> for ArtifactVersion {
    type Error = InvalidVersion;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let reject = |reason: String| InvalidVersion {
            value: value.to_owned(),
            reason,
        };
        if value.is_empty() {
            return Err(reject("version must not be empty".to_owned()));
        }
        if let Some(bad) = value.chars().find(|c| !is_valid_version_char(*c)) {
            return Err(reject(format!("invalid character '{bad}'")));
        }
        if value.starts_with('.') {
            return Err(reject("version must not start with '.'".to_owned()));
        }
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for ArtifactVersion {
    type Error = InvalidVersion;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl std::str::FromStr for ArtifactVersion {
    type Err = InvalidVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl AsRef<str> for ArtifactVersion {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
