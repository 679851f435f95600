//! Error types for native package generation.

use camino::Utf8PathBuf;
use stagehand_common::FsError;
use thiserror::Error;

/// Errors arising from packaging configuration or packaging-tool runs.
#[derive(Debug, Error)]
pub enum PackagingError {
    /// The configuration file could not be read.
    #[error("failed to read packaging config {path}: {source}")]
    ConfigRead {
        /// The configuration file path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for the expected schema.
    #[error("failed to parse packaging config {path}: {source}")]
    ConfigParse {
        /// The configuration file path.
        path: Utf8PathBuf,
        /// The parser error.
        #[source]
        source: toml::de::Error,
    },

    /// The configuration parsed but violates a constraint.
    #[error("invalid packaging config: {reason}")]
    InvalidConfig {
        /// Description of the violated constraint.
        reason: String,
    },

    /// No package formats were requested.
    #[error("no package formats requested")]
    NoFormats,

    /// A path could not be made absolute or is not valid UTF-8.
    #[error("cannot resolve path {path}: {reason}")]
    PathResolution {
        /// The path as given.
        path: Utf8PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// The system clock could not provide the copyright year.
    #[error("system clock error: {0}")]
    Clock(#[from] std::time::SystemTimeError),

    /// The per-format scratch directory could not be reset.
    #[error("failed to reset scratch directory for {format}: {source}")]
    ScratchReset {
        /// The package format tag.
        format: String,
        /// The filesystem failure.
        #[source]
        source: FsError,
    },

    /// The packaging tool could not be started.
    #[error("failed to launch {tool} for {format}: {source}")]
    Spawn {
        /// The package format tag.
        format: String,
        /// The packaging tool path.
        tool: Utf8PathBuf,
        /// The spawn error.
        #[source]
        source: std::io::Error,
    },

    /// The packaging tool exited unsuccessfully.
    #[error("{tool} failed for {format}: {status}")]
    ToolFailed {
        /// The package format tag.
        format: String,
        /// The packaging tool path.
        tool: Utf8PathBuf,
        /// The reported exit status.
        status: String,
    },

    /// The packaging tool did not finish within the allowed time and was
    /// killed.
    #[error("{tool} timed out for {format} after {seconds}s")]
    TimedOut {
        /// The package format tag.
        format: String,
        /// The packaging tool path.
        tool: Utf8PathBuf,
        /// The wait bound in seconds.
        seconds: u64,
    },

    /// One or more formats failed; every requested format was attempted.
    #[error("{} of {attempted} package formats failed: {}", failures.len(), summarise(failures))]
    FormatsFailed {
        /// Number of formats attempted.
        attempted: usize,
        /// The failure of each unsuccessful format, in request order.
        failures: Vec<PackagingError>,
    },
}

fn summarise(failures: &[PackagingError]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias using [`PackagingError`].
pub type Result<T> = std::result::Result<T, PackagingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_failed_lists_each_failure() {
        let err = PackagingError::FormatsFailed {
            attempted: 3,
            failures: vec![
                PackagingError::ToolFailed {
                    format: "deb".to_owned(),
                    tool: Utf8PathBuf::from("jpackage"),
                    status: "exit status: 1".to_owned(),
                },
                PackagingError::TimedOut {
                    format: "rpm".to_owned(),
                    tool: Utf8PathBuf::from("jpackage"),
                    seconds: 900,
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("2 of 3 package formats failed"));
        assert!(msg.contains("failed for deb"));
        assert!(msg.contains("timed out for rpm after 900s"));
    }
}
