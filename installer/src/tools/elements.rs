//! Elements release archives from the `ElementsProject` GitHub releases.

use super::BinaryTool;
use crate::version::ArtifactVersion;
use stagehand_common::Platform;

/// Elements, the Liquid sidechain node.
///
/// Upstream publishes a single Intel macOS build, which is also served to
/// Apple silicon hosts.
#[derive(Debug, Clone, Copy, Default)]
pub struct Elements;

impl BinaryTool for Elements {
    fn component(&self) -> &str {
        "elements"
    }

    fn url_prefix(&self, version: &ArtifactVersion) -> String {
        format!(
            "https://github.com/ElementsProject/elements/releases/download/elements-{version}/elements-{version}-"
        )
    }

    fn suffix_for(&self, platform: Platform) -> &str {
        match platform {
            Platform::Linux => "x86_64-linux-gnu.tar.gz",
            Platform::MacOsX86_64 | Platform::MacOsArm64 => "osx64.tar.gz",
            Platform::Windows => "win64.zip",
        }
    }
}
