//! Platform-specific default directories.

use camino::Utf8PathBuf;
use directories_next::ProjectDirs;

/// Source of the per-user data directory.
#[cfg_attr(test, mockall::automock)]
pub trait BaseDirs {
    /// The per-user data directory for stagehand, if one can be determined.
    fn data_dir(&self) -> Option<Utf8PathBuf>;
}

/// Resolves directories from the host's conventions.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBaseDirs;

impl BaseDirs for SystemBaseDirs {
    fn data_dir(&self) -> Option<Utf8PathBuf> {
        ProjectDirs::from("", "", "stagehand")
            .and_then(|dirs| Utf8PathBuf::from_path_buf(dirs.data_local_dir().to_path_buf()).ok())
    }
}

/// Where tool releases are installed when no directory is given.
#[must_use]
pub fn default_install_dir(dirs: &dyn BaseDirs) -> Option<Utf8PathBuf> {
    dirs.data_dir().map(|dir| dir.join("tools"))
}
