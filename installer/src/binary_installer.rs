//! Cache-aware provisioning of a tool release.
//!
//! [`BinaryInstaller`] runs the shared skeleton for every [`BinaryTool`]:
//!
//! 1. derive the bin directory from the [`InstallLayout`];
//! 2. return it straight away if it already exists;
//! 3. otherwise download the platform archive into a temporary directory,
//!    optionally check it against a pinned SHA-256, and unpack it into the
//!    install directory;
//! 4. return the bin directory.
//!
//! The returned path is meant to be put on the caller's execution search
//! path (see [`crate::search_path`]).

use crate::artefact::download::ArtefactDownloader;
use crate::artefact::extraction::ArtefactExtractor;
use crate::error::{InstallError, Result};
use crate::layout::InstallLayout;
use crate::tools::BinaryTool;
use crate::version::ArtifactVersion;
use camino::Utf8PathBuf;
use log::{debug, info};
use stagehand_common::{Platform, Sha256Digest};
use std::path::Path;

/// The provisioning capability shared by every tool installer.
pub trait Installer {
    /// Ensure `version` is unpacked locally and return its bin directory.
    ///
    /// Calling this again for an installed version performs no network or
    /// archive work.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError`] when the download, verification, or
    /// extraction fails.
    fn install(&self, version: &ArtifactVersion) -> Result<Utf8PathBuf>;
}

/// Installs releases of one tool for one platform.
pub struct BinaryInstaller<'a> {
    tool: &'a dyn BinaryTool,
    platform: Platform,
    layout: InstallLayout,
    downloader: &'a dyn ArtefactDownloader,
    extractor: &'a dyn ArtefactExtractor,
    expected_sha256: Option<Sha256Digest>,
}

impl<'a> BinaryInstaller<'a> {
    /// Create an installer for `tool` on `platform`.
    #[must_use]
    pub fn new(
        tool: &'a dyn BinaryTool,
        platform: Platform,
        layout: InstallLayout,
        downloader: &'a dyn ArtefactDownloader,
        extractor: &'a dyn ArtefactExtractor,
    ) -> Self {
        Self {
            tool,
            platform,
            layout,
            downloader,
            extractor,
            expected_sha256: None,
        }
    }

    /// Require the downloaded archive to hash to `digest` before it is
    /// unpacked.
    ///
    /// Cache hits are not re-verified.
    #[must_use]
    pub fn with_expected_sha256(mut self, digest: Sha256Digest) -> Self {
        self.expected_sha256 = Some(digest);
        self
    }

    /// The bin directory `version` installs to, whether or not it exists.
    #[must_use]
    pub fn bin_dir(&self, version: &ArtifactVersion) -> Utf8PathBuf {
        self.layout.bin_dir(self.tool.component(), version)
    }

    fn verify_checksum(&self, url: &str, archive_path: &Path) -> Result<()> {
        let Some(expected) = &self.expected_sha256 else {
            return Ok(());
        };
        let actual = Sha256Digest::of_file(archive_path)?;
        if &actual != expected {
            return Err(InstallError::ChecksumMismatch {
                url: url.to_owned(),
                expected: expected.to_string(),
                actual: actual.into_inner(),
            });
        }
        debug!("checksum verified for {url}");
        Ok(())
    }
}

impl Installer for BinaryInstaller<'_> {
    fn install(&self, version: &ArtifactVersion) -> Result<Utf8PathBuf> {
        let component = self.tool.component();
        let bin_dir = self.bin_dir(version);
        if self.layout.is_cached(component, version) {
            debug!("{component} {version} already present at {bin_dir}");
            return Ok(bin_dir);
        }

        let url = self.tool.download_url(version, self.platform);
        let staging = tempfile::tempdir()?;
        let archive_path = staging.path().join(archive_file_name(&url));

        info!("downloading {component} {version} for {}", self.platform);
        self.downloader.download(&url, &archive_path)?;
        self.verify_checksum(&url, &archive_path)?;

        let install_dir = self.layout.install_dir();
        std::fs::create_dir_all(install_dir)?;
        let entries = self
            .extractor
            .extract(&archive_path, install_dir.as_std_path())?;
        info!("unpacked {entries} entries for {component} {version} into {install_dir}");

        if !self.layout.is_cached(component, version) {
            return Err(InstallError::MissingBinDir {
                component: component.to_owned(),
                path: bin_dir,
            });
        }
        Ok(bin_dir)
    }
}

/// The last path segment of `url`, without any query string.
fn archive_file_name(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
#[path = "binary_installer_tests.rs"]
mod tests;
