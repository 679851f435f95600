//! Error types for binary provisioning and the `stagehand` commands.
//!
//! Every failure is fatal to the install step that raised it and is handed
//! back to the caller unchanged; nothing here retries or falls back.

use crate::artefact::download::DownloadError;
use crate::artefact::extraction::ExtractionError;
use crate::hash_manifest::ManifestError;
use crate::packaging::PackagingError;
use camino::Utf8PathBuf;
use stagehand_common::UnsupportedPlatform;
use thiserror::Error;

/// Errors that can occur while provisioning a tool release.
#[derive(Debug, Error)]
pub enum InstallError {
    /// The host is not one of the supported platforms.
    #[error(transparent)]
    UnsupportedPlatform(#[from] UnsupportedPlatform),

    /// The release archive could not be downloaded.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// The release archive could not be unpacked.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// The downloaded archive does not match the pinned digest.
    #[error("checksum mismatch for {url}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// The URL the archive was fetched from.
        url: String,
        /// The pinned digest.
        expected: String,
        /// The digest of the downloaded bytes.
        actual: String,
    },

    /// The archive unpacked but did not produce the expected bin directory.
    #[error("archive for {component} did not contain {path}")]
    MissingBinDir {
        /// The tool being installed.
        component: String,
        /// The directory that should exist after extraction.
        path: Utf8PathBuf,
    },

    /// An I/O operation on the install or staging directory failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`InstallError`].
pub type Result<T> = std::result::Result<T, InstallError>;

/// Errors surfaced by the `stagehand` commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The host is not one of the supported platforms.
    #[error(transparent)]
    UnsupportedPlatform(#[from] UnsupportedPlatform),

    /// Provisioning failed.
    #[error(transparent)]
    Install(#[from] InstallError),

    /// Packaging failed.
    #[error(transparent)]
    Packaging(#[from] PackagingError),

    /// The hash manifest could not be produced.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// No install directory was given and none could be derived.
    #[error("could not determine a default install directory; pass --install-dir")]
    NoInstallDir,

    /// A command result could not be written to stdout.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_platform_message_names_host() {
        let err = InstallError::from(UnsupportedPlatform {
            os: "plan9".to_owned(),
            arch: "mips".to_owned(),
        });
        let msg = err.to_string();
        assert!(msg.contains("plan9"));
        assert!(msg.contains("mips"));
    }

    #[test]
    fn checksum_mismatch_reports_both_digests() {
        let err = InstallError::ChecksumMismatch {
            url: "https://example.test/tool.tar.gz".to_owned(),
            expected: "aa".to_owned(),
            actual: "bb".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("expected aa"));
        assert!(msg.contains("got bb"));
    }

    #[test]
    fn unsupported_archive_surfaces_file_name() {
        let err = InstallError::from(ExtractionError::UnsupportedArchiveFormat {
            file_name: "tool.7z".to_owned(),
        });
        assert_eq!(err.to_string(), "unknown archive format: tool.7z");
    }

    #[test]
    fn cli_error_is_transparent_over_install_errors() {
        let err = CliError::from(InstallError::MissingBinDir {
            component: "bitcoin".to_owned(),
            path: Utf8PathBuf::from("/opt/bitcoin-27.0/bin"),
        });
        assert_eq!(
            err.to_string(),
            "archive for bitcoin did not contain /opt/bitcoin-27.0/bin"
        );
    }
}
