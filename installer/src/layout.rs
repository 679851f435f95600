//! On-disk layout of provisioned tools.
//!
//! A tool release unpacks to `<install_dir>/<component>-<version>/` and its
//! executables live in the `bin` directory below that. The mapping is a pure
//! function of its inputs, so the cache check and the value handed back to
//! callers always agree.

use crate::version::ArtifactVersion;
use camino::{Utf8Path, Utf8PathBuf};

/// Name of the executable directory inside an unpacked release.
const BIN_DIR_NAME: &str = "bin";

/// Root directory that provisioned tool releases are unpacked into.
///
/// # Examples
///
/// ```
/// use camino::Utf8PathBuf;
/// use stagehand_installer::layout::InstallLayout;
/// use stagehand_installer::version::ArtifactVersion;
///
/// let layout = InstallLayout::new(Utf8PathBuf::from("/opt/tools"));
/// let version = ArtifactVersion::try_from("27.0").expect("valid");
/// assert_eq!(
///     layout.bin_dir("bitcoin", &version),
///     Utf8PathBuf::from("/opt/tools/bitcoin-27.0/bin"),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    install_dir: Utf8PathBuf,
}

impl InstallLayout {
    /// Create a layout rooted at `install_dir`.
    #[must_use]
    pub fn new(install_dir: Utf8PathBuf) -> Self {
        Self { install_dir }
    }

    /// The unpack root.
    #[must_use]
    pub fn install_dir(&self) -> &Utf8Path {
        &self.install_dir
    }

    /// Directory a release of `component` unpacks into.
    #[must_use]
    pub fn release_dir(&self, component: &str, version: &ArtifactVersion) -> Utf8PathBuf {
        self.install_dir.join(format!("{component}-{version}"))
    }

    /// Directory holding the executables of a release of `component`.
    #[must_use]
    pub fn bin_dir(&self, component: &str, version: &ArtifactVersion) -> Utf8PathBuf {
        self.release_dir(component, version).join(BIN_DIR_NAME)
    }

    /// Whether the release is already unpacked.
    ///
    /// Only existence is checked; the contents are not inspected.
    #[must_use]
    pub fn is_cached(&self, component: &str, version: &ArtifactVersion) -> bool {
        self.bin_dir(component, version).exists()
    }
}
