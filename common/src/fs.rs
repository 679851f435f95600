//! Filesystem helpers with explicit error reporting.

use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::io;
use thiserror::Error;

/// Errors raised while removing or recreating directories.
#[derive(Debug, Error)]
pub enum FsError {
    /// The path could not be removed.
    #[error("failed to remove {path}: {source}")]
    Remove {
        /// The path being removed.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The directory could not be created.
    #[error("failed to create {path}: {source}")]
    Create {
        /// The directory being created.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Remove `path` and everything below it.
///
/// A missing target is not an error. Files and symlinks are unlinked rather
/// than followed.
///
/// # Errors
///
/// Returns [`FsError::Remove`] naming the first entry that could not be
/// deleted.
pub fn remove_all(path: &Utf8Path) -> Result<(), FsError> {
    let metadata = match std::fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(source) => {
            return Err(FsError::Remove {
                path: path.to_owned(),
                source,
            });
        }
    };

    let removal = if metadata.is_dir() {
        let entries = path.read_dir_utf8().map_err(|source| FsError::Remove {
            path: path.to_owned(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| FsError::Remove {
                path: path.to_owned(),
                source,
            })?;
            remove_all(entry.path())?;
        }
        std::fs::remove_dir(path)
    } else {
        std::fs::remove_file(path)
    };
    removal.map_err(|source| FsError::Remove {
        path: path.to_owned(),
        source,
    })
}

/// Delete `dir` if present, then create it empty.
///
/// # Errors
///
/// Returns [`FsError`] when either the removal or the creation fails.
pub fn reset_dir(dir: &Utf8Path) -> Result<(), FsError> {
    debug!("resetting directory {dir}");
    remove_all(dir)?;
    std::fs::create_dir_all(dir).map_err(|source| FsError::Create {
        path: dir.to_owned(),
        source,
    })
}
