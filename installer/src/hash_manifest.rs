//! SHA-256 manifests for release artefacts.
//!
//! A manifest has one `label:file_name:digest` line per artefact, in the
//! order the artefacts were given, each terminated by `\n`.

use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use stagehand_common::Sha256Digest;
use std::fmt;
use thiserror::Error;

/// Errors raised while building or writing a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// An artefact could not be read; no manifest is produced.
    #[error("failed to hash {path}: {source}")]
    Read {
        /// The unreadable artefact.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A label or file name cannot be represented in a manifest line.
    #[error("{field} \"{value}\" cannot appear in a manifest line")]
    InvalidField {
        /// Which field was rejected.
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The manifest could not be written.
    #[error("failed to write manifest {path}: {source}")]
    Write {
        /// The manifest path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias using [`ManifestError`].
pub type Result<T> = std::result::Result<T, ManifestError>;

/// One manifest line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashRecord {
    /// Platform label such as `linux`, `macOS` or `windows`.
    pub platform_label: String,
    /// Base name of the artefact.
    pub file_name: String,
    /// Lowercase hex SHA-256 of the artefact's contents.
    pub digest: Sha256Digest,
}

impl fmt::Display for HashRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.platform_label, self.file_name, self.digest)
    }
}

/// An ordered list of [`HashRecord`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashManifest {
    records: Vec<HashRecord>,
}

impl HashManifest {
    /// Hash every file in `files` under `platform_label`.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::InvalidField`] if the label or a file name
    /// contains `:` or a line break, and [`ManifestError::Read`] for the
    /// first unreadable file.
    pub fn generate<P: AsRef<Utf8Path>>(files: &[P], platform_label: &str) -> Result<Self> {
        check_field("platform label", platform_label)?;
        let records = files
            .iter()
            .map(|path| hash_record(path.as_ref(), platform_label))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { records })
    }

    /// The records in input order.
    #[must_use]
    pub fn records(&self) -> &[HashRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the manifest has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The manifest text, one newline-terminated line per record.
    #[must_use]
    pub fn render(&self) -> String {
        self.records
            .iter()
            .map(|record| format!("{record}\n"))
            .collect()
    }
}

fn hash_record(path: &Utf8Path, platform_label: &str) -> Result<HashRecord> {
    let file_name = path.file_name().ok_or_else(|| ManifestError::InvalidField {
        field: "file name",
        value: path.to_string(),
    })?;
    check_field("file name", file_name)?;
    let digest = Sha256Digest::of_file(path.as_std_path()).map_err(|source| ManifestError::Read {
        path: path.to_owned(),
        source,
    })?;
    debug!(target: "manifest", "{file_name}: {digest}");
    Ok(HashRecord {
        platform_label: platform_label.to_owned(),
        file_name: file_name.to_owned(),
        digest,
    })
}

fn check_field(field: &'static str, value: &str) -> Result<()> {
    if value.is_empty() || value.contains([':', '\n', '\r']) {
        return Err(ManifestError::InvalidField {
            field,
            value: value.to_owned(),
        });
    }
    Ok(())
}

/// Write `manifest` to `path`, creating parent directories.
///
/// # Errors
///
/// Returns [`ManifestError::Write`] if a directory or the file cannot be
/// written.
pub fn write_manifest(path: &Utf8Path, manifest: &HashManifest) -> Result<()> {
    let write_error = |source| ManifestError::Write {
        path: path.to_owned(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    std::fs::write(path, manifest.render()).map_err(write_error)
}
