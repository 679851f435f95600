//! Provisioned tools and their per-platform download URLs.
//!
//! Each tool supplies a versioned URL prefix and one literal suffix per
//! [`Platform`]. Suffix tables are `match` expressions without a wildcard arm,
//! so a new platform variant fails to compile until every tool handles it.
//!
//! # Sub-modules
//!
//! - [`bitcoin`] - Bitcoin Core release archives.
//! - [`elements`] - Elements release archives.
//! - [`template`] - Tools described at runtime by a URL template.

pub mod bitcoin;
pub mod elements;
pub mod template;

use crate::version::ArtifactVersion;
use stagehand_common::Platform;

pub use bitcoin::BitcoinCore;
pub use elements::Elements;
pub use template::{PlatformSuffixes, TemplateTool};

/// A third-party binary that can be provisioned.
///
/// Implementations only describe where a release lives; the download,
/// extraction, and caching skeleton is shared by
/// [`crate::binary_installer::BinaryInstaller`].
pub trait BinaryTool {
    /// Component name, used for the install directory
    /// (`<component>-<version>`).
    fn component(&self) -> &str;

    /// The URL shared by every platform build of `version`.
    fn url_prefix(&self, version: &ArtifactVersion) -> String;

    /// The platform-specific tail appended to [`BinaryTool::url_prefix`].
    fn suffix_for(&self, platform: Platform) -> &str;

    /// Describe every platform's download for `version`.
    fn download_spec(&self, version: &ArtifactVersion) -> DownloadSpec {
        DownloadSpec {
            url_prefix: self.url_prefix(version),
            suffixes: PlatformSuffixes::from_fn(|platform| self.suffix_for(platform).to_owned()),
        }
    }

    /// Resolved download URL for `version` on `platform`.
    fn download_url(&self, version: &ArtifactVersion, platform: Platform) -> String {
        format!("{}{}", self.url_prefix(version), self.suffix_for(platform))
    }
}

/// A URL prefix plus its per-platform suffixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSpec {
    /// Versioned release path shared by all platforms.
    pub url_prefix: String,
    /// The literal appended for each platform.
    pub suffixes: PlatformSuffixes,
}

impl DownloadSpec {
    /// Resolved URL for `platform`.
    #[must_use]
    pub fn url_for(&self, platform: Platform) -> String {
        format!("{}{}", self.url_prefix, self.suffixes.suffix_for(platform))
    }
}

/// The tools registered with the `stagehand install` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ToolKind {
    /// Bitcoin Core (`bitcoind`, `bitcoin-cli`, ...).
    Bitcoin,
    /// Elements (`elementsd`, `elements-cli`, ...).
    Elements,
}

impl ToolKind {
    /// Every registered tool.
    pub const ALL: [Self; 2] = [Self::Bitcoin, Self::Elements];

    /// The tool description backing this kind.
    #[must_use]
    pub fn tool(self) -> Box<dyn BinaryTool> {
        match self {
            Self::Bitcoin => Box::new(BitcoinCore),
            Self::Elements => Box::new(Elements),
        }
    }
}
