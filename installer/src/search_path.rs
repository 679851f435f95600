//! Registration of provisioned bin directories on the execution search path.
//!
//! The installer only returns a directory; these helpers build the `PATH`
//! value a caller hands to child processes so the provisioned executables
//! are found first.

use camino::Utf8Path;
use std::env::{self, JoinPathsError};
use std::ffi::OsString;
use std::path::PathBuf;

/// Name of the search path environment variable.
pub const PATH_VAR: &str = "PATH";

/// Prepend `dir` to the search path `current`.
///
/// An existing occurrence of `dir` is moved to the front rather than
/// duplicated.
///
/// # Errors
///
/// Returns [`JoinPathsError`] if `dir` contains the platform path separator.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use stagehand_installer::search_path::prepend;
///
/// # #[cfg(unix)]
/// # {
/// let path = prepend(Utf8Path::new("/opt/tools/bitcoin-27.0/bin"), Some("/usr/bin:/bin".into()))
///     .expect("joinable");
/// assert_eq!(path, "/opt/tools/bitcoin-27.0/bin:/usr/bin:/bin");
/// # }
/// ```
pub fn prepend(dir: &Utf8Path, current: Option<OsString>) -> Result<OsString, JoinPathsError> {
    let dir = dir.as_std_path();
    let rest: Vec<PathBuf> = current
        .as_deref()
        .map(|value| env::split_paths(value).filter(|entry| entry != dir).collect())
        .unwrap_or_default();
    env::join_paths(std::iter::once(dir.to_path_buf()).chain(rest))
}

/// Prepend `dir` to this process's `PATH` value and return the result.
///
/// The process environment itself is left untouched.
///
/// # Errors
///
/// Returns [`JoinPathsError`] if `dir` contains the platform path separator.
pub fn prepend_to_process_path(dir: &Utf8Path) -> Result<OsString, JoinPathsError> {
    prepend(dir, env::var_os(PATH_VAR))
}
