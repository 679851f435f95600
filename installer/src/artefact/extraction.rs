//! Release archive extraction.
//!
//! The decompression routine is chosen from the archive's file name:
//! `.tar.gz` archives go through `flate2` and `tar`, `.zip` archives through
//! `zip`. Any other name is rejected before the file is opened. Every entry
//! path is validated so nothing is written outside the destination
//! directory.
//!
//! A failure part-way through leaves whatever was already unpacked in place.

use flate2::read::GzDecoder;
use log::debug;
use std::fs::File;
use std::io::BufReader;
use std::path::{Component, Path, PathBuf};

/// Trait for extracting release archives, enabling test mocking.
///
/// # Examples
///
/// ```
/// use stagehand_installer::artefact::extraction::ArchiveExtractor;
///
/// let extractor = ArchiveExtractor;
/// // Use extractor.extract(archive_path, dest_dir) in production
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ArtefactExtractor {
    /// Extract the archive at `archive_path` into `dest_dir`.
    ///
    /// Returns the number of entries written.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::UnsupportedArchiveFormat`] if the file name
    /// has no recognised suffix, [`ExtractionError::PathTraversal`] if an
    /// entry escapes `dest_dir`, [`ExtractionError::EmptyArchive`] if nothing
    /// was unpacked, and [`ExtractionError::Io`] or [`ExtractionError::Zip`]
    /// on read failures.
    fn extract(&self, archive_path: &Path, dest_dir: &Path) -> Result<usize, ExtractionError>;
}

/// Errors arising from archive extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// The file name does not end in a supported archive suffix.
    #[error("unknown archive format: {file_name}")]
    UnsupportedArchiveFormat {
        /// The rejected file name.
        file_name: String,
    },

    /// I/O error during extraction.
    #[error("extraction I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The zip container could not be read.
    #[error("zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A path in the archive attempts to traverse outside the destination.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The offending path from the archive entry.
        path: String,
    },

    /// The archive contains no entries.
    #[error("archive contains no entries")]
    EmptyArchive,
}

/// The archive encodings understood by [`ArchiveExtractor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// A gzip-compressed tarball (`.tar.gz`).
    TarGz,
    /// A zip archive (`.zip`).
    Zip,
}

impl ArchiveFormat {
    /// Pick the format from the file name of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::UnsupportedArchiveFormat`] for any other
    /// suffix, including a missing file name.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use stagehand_installer::artefact::extraction::ArchiveFormat;
    ///
    /// let format = ArchiveFormat::from_path(Path::new("bitcoin-27.0-win64.zip"));
    /// assert_eq!(format.ok(), Some(ArchiveFormat::Zip));
    /// assert!(ArchiveFormat::from_path(Path::new("x.7z")).is_err());
    /// ```
    pub fn from_path(path: &Path) -> Result<Self, ExtractionError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        if file_name.ends_with(".tar.gz") {
            Ok(Self::TarGz)
        } else if file_name.ends_with(".zip") {
            Ok(Self::Zip)
        } else {
            Err(ExtractionError::UnsupportedArchiveFormat { file_name })
        }
    }
}

/// Default extractor dispatching on [`ArchiveFormat`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveExtractor;

impl ArtefactExtractor for ArchiveExtractor {
    fn extract(&self, archive_path: &Path, dest_dir: &Path) -> Result<usize, ExtractionError> {
        let format = ArchiveFormat::from_path(archive_path)?;
        debug!(
            "extracting {} as {format:?} into {}",
            archive_path.display(),
            dest_dir.display()
        );
        let count = match format {
            ArchiveFormat::TarGz => extract_tar_gz(archive_path, dest_dir)?,
            ArchiveFormat::Zip => extract_zip(archive_path, dest_dir)?,
        };
        if count == 0 {
            return Err(ExtractionError::EmptyArchive);
        }
        Ok(count)
    }
}

/// Unpack a gzip-compressed tarball.
///
/// Symbolic and hard links must resolve inside `dest_dir`, and no entry may
/// be written through a link that leads out of it.
fn extract_tar_gz(archive_path: &Path, dest_dir: &Path) -> Result<usize, ExtractionError> {
    let file = File::open(archive_path)?;
    let decoder = GzDecoder::new(BufReader::new(file));
    let mut archive = tar::Archive::new(decoder);
    std::fs::create_dir_all(dest_dir)?;
    let root = dest_dir.canonicalize()?;
    let mut count = 0;

    for entry_result in archive.entries()? {
        let mut entry = entry_result?;
        let entry_path = entry.path()?.into_owned();

        validate_entry_path(&entry_path)?;
        let parent = resolved_parent(&root, &entry_path)?;

        let entry_type = entry.header().entry_type();
        if entry_type.is_symlink() || entry_type.is_hard_link() {
            let target = entry.link_name()?.map(|name| name.into_owned());
            // Hard link targets are named from the archive root.
            let base = if entry_type.is_hard_link() {
                PathBuf::new()
            } else {
                parent
            };
            if target.is_none_or(|target| !stays_inside(&base, &target)) {
                return Err(traversal(&entry_path));
            }
        }

        if !entry.unpack_in(&root)? {
            return Err(traversal(&entry_path));
        }
        count += 1;
    }

    Ok(count)
}

/// Locate the parent of `entry_path` relative to `root` after following any
/// links already unpacked along the way.
fn resolved_parent(root: &Path, entry_path: &Path) -> Result<PathBuf, ExtractionError> {
    let mut existing = root.to_path_buf();
    let mut pending = PathBuf::new();
    for component in entry_path.parent().into_iter().flat_map(Path::components) {
        let candidate = existing.join(component);
        if pending.as_os_str().is_empty() && candidate.symlink_metadata().is_ok() {
            existing = candidate;
        } else {
            pending.push(component);
        }
    }
    let canonical = existing.canonicalize()?;
    let inside = canonical
        .strip_prefix(root)
        .map_err(|_| traversal(entry_path))?;
    Ok(inside.join(pending))
}

/// Whether `target`, read relative to the directory `base`, stays at or
/// below the extraction root.
fn stays_inside(base: &Path, target: &Path) -> bool {
    let mut depth = base.components().count();
    for component in target.components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir => match depth.checked_sub(1) {
                Some(parent) => depth = parent,
                None => return false,
            },
            Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    true
}

fn traversal(path: &Path) -> ExtractionError {
    ExtractionError::PathTraversal {
        path: path.display().to_string(),
    }
}

/// Unpack a zip archive, keeping Unix permission bits where recorded.
fn extract_zip(archive_path: &Path, dest_dir: &Path) -> Result<usize, ExtractionError> {
    let file = File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))?;
    let mut count = 0;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let entry_path = PathBuf::from(entry.name());

        validate_entry_path(&entry_path)?;

        let dest_path = dest_dir.join(&entry_path);
        if entry.is_dir() {
            std::fs::create_dir_all(&dest_path)?;
        } else {
            if let Some(parent) = dest_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let mut out = File::create(&dest_path)?;
            std::io::copy(&mut entry, &mut out)?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Some(mode) = entry.unix_mode() {
                    std::fs::set_permissions(&dest_path, std::fs::Permissions::from_mode(mode))?;
                }
            }
        }
        count += 1;
    }

    Ok(count)
}

/// Validate that an entry path does not escape the destination directory
/// via `..` components or absolute paths.
fn validate_entry_path(path: &Path) -> Result<(), ExtractionError> {
    let escapes = path.is_absolute()
        || path.components().any(|component| {
            matches!(
                component,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
    if escapes {
        return Err(traversal(path));
    }
    Ok(())
}

#[cfg(test)]
#[path = "extraction_tests.rs"]
mod tests;
