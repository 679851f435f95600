//! Bitcoin Core release archives from `bitcoincore.org`.

use super::BinaryTool;
use crate::version::ArtifactVersion;
use stagehand_common::Platform;

/// Bitcoin Core, as published at `https://bitcoincore.org/bin/`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitcoinCore;

impl BinaryTool for BitcoinCore {
    fn component(&self) -> &str {
        "bitcoin"
    }

    fn url_prefix(&self, version: &ArtifactVersion) -> String {
        format!("https://bitcoincore.org/bin/bitcoin-core-{version}/bitcoin-{version}-")
    }

    fn suffix_for(&self, platform: Platform) -> &str {
        match platform {
            Platform::Linux => "x86_64-linux-gnu.tar.gz",
            Platform::MacOsX86_64 => "x86_64-apple-darwin.tar.gz",
            Platform::MacOsArm64 => "arm64-apple-darwin.tar.gz",
            Platform::Windows => "win64.zip",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::linux(
        Platform::Linux,
        "https://bitcoincore.org/bin/bitcoin-core-27.0/bitcoin-27.0-x86_64-linux-gnu.tar.gz"
    )]
    #[case::mac_arm(
        Platform::MacOsArm64,
        "https://bitcoincore.org/bin/bitcoin-core-27.0/bitcoin-27.0-arm64-apple-darwin.tar.gz"
    )]
    #[case::windows(
        Platform::Windows,
        "https://bitcoincore.org/bin/bitcoin-core-27.0/bitcoin-27.0-win64.zip"
    )]
    fn resolves_release_urls(#[case] platform: Platform, #[case] expected: &str) {
        let version = ArtifactVersion::try_from("27.0").expect("valid");
        assert_eq!(BitcoinCore.download_url(&version, platform), expected);
    }
}
