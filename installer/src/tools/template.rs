//! Tools described by data rather than code.
//!
//! A [`TemplateTool`] carries its URL prefix as a template containing
//! `{version}` placeholders plus a [`PlatformSuffixes`] table. Because the
//! table is a struct with one field per platform, a missing entry is a
//! construction-time error rather than a lookup failure.

use super::BinaryTool;
use crate::version::ArtifactVersion;
use stagehand_common::Platform;

/// Placeholder substituted with the release version in URL templates.
const VERSION_PLACEHOLDER: &str = "{version}";

/// One download suffix per supported platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformSuffixes {
    /// Suffix for [`Platform::Linux`].
    pub linux: String,
    /// Suffix for [`Platform::MacOsX86_64`].
    pub macos_x86_64: String,
    /// Suffix for [`Platform::MacOsArm64`].
    pub macos_arm64: String,
    /// Suffix for [`Platform::Windows`].
    pub windows: String,
}

impl PlatformSuffixes {
    /// Build the table by asking `suffix` for each platform.
    pub fn from_fn(mut suffix: impl FnMut(Platform) -> String) -> Self {
        Self {
            linux: suffix(Platform::Linux),
            macos_x86_64: suffix(Platform::MacOsX86_64),
            macos_arm64: suffix(Platform::MacOsArm64),
            windows: suffix(Platform::Windows),
        }
    }

    /// The suffix registered for `platform`.
    #[must_use]
    pub fn suffix_for(&self, platform: Platform) -> &str {
        match platform {
            Platform::Linux => &self.linux,
            Platform::MacOsX86_64 => &self.macos_x86_64,
            Platform::MacOsArm64 => &self.macos_arm64,
            Platform::Windows => &self.windows,
        }
    }
}

/// A tool whose URL prefix is a `{version}` template.
///
/// # Examples
///
/// ```
/// use stagehand_common::Platform;
/// use stagehand_installer::tools::{BinaryTool, PlatformSuffixes, TemplateTool};
/// use stagehand_installer::version::ArtifactVersion;
///
/// let tool = TemplateTool::new(
///     "tool",
///     "https://example.org/tool-{version}/tool-{version}-",
///     PlatformSuffixes {
///         linux: "x86_64-linux-gnu.tar.gz".into(),
///         macos_x86_64: "osx64.tar.gz".into(),
///         macos_arm64: "arm64-apple-darwin.tar.gz".into(),
///         windows: "win64.zip".into(),
///     },
/// );
/// let version = ArtifactVersion::try_from("3.2.1").expect("valid");
/// assert_eq!(
///     tool.download_url(&version, Platform::Linux),
///     "https://example.org/tool-3.2.1/tool-3.2.1-x86_64-linux-gnu.tar.gz",
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateTool {
    component: String,
    url_prefix_template: String,
    suffixes: PlatformSuffixes,
}

impl TemplateTool {
    /// Describe a tool from its component name, prefix template, and
    /// suffix table.
    pub fn new(
        component: impl Into<String>,
        url_prefix_template: impl Into<String>,
        suffixes: PlatformSuffixes,
    ) -> Self {
        Self {
            component: component.into(),
            url_prefix_template: url_prefix_template.into(),
            suffixes,
        }
    }
}

impl BinaryTool for TemplateTool {
    fn component(&self) -> &str {
        &self.component
    }

    fn url_prefix(&self, version: &ArtifactVersion) -> String {
        self.url_prefix_template
            .replace(VERSION_PLACEHOLDER, version.as_str())
    }

    fn suffix_for(&self, platform: Platform) -> &str {
        self.suffixes.suffix_for(platform)
    }
}
