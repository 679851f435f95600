//! Test support utilities for installer behavioural tests.
//!
//! Provides UTF-8 temporary directories, release archive builders and a
//! downloader that serves archives from the local filesystem.

use camino::{Utf8Path, Utf8PathBuf};
use flate2::Compression;
use flate2::write::GzEncoder;
use stagehand_installer::artefact::download::{ArtefactDownloader, DownloadError};
use std::cell::RefCell;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Create a temporary directory together with its UTF-8 path.
pub fn utf8_temp_dir() -> (TempDir, Utf8PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
    (dir, path)
}

/// Write a `.tar.gz` release archive holding `files` (path, contents).
pub fn write_release_tar_gz(archive: &Utf8Path, files: &[(&str, &[u8])]) {
    let file = fs::File::create(archive).expect("create archive");
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (path, contents) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder
            .append_data(&mut header, path, *contents)
            .expect("append entry");
    }
    builder
        .into_inner()
        .expect("finish tar")
        .finish()
        .expect("finish gzip");
}

/// A downloader that copies one local archive to every destination and
/// records the requested URLs.
pub struct LocalMirror {
    archive: Utf8PathBuf,
    requests: RefCell<Vec<String>>,
}

impl LocalMirror {
    /// Serve `archive` for every request.
    pub fn new(archive: Utf8PathBuf) -> Self {
        Self {
            archive,
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Every URL requested so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl ArtefactDownloader for LocalMirror {
    fn download(&self, url: &str, dest: &Path) -> Result<(), DownloadError> {
        self.requests.borrow_mut().push(url.to_owned());
        if !self.archive.exists() {
            return Err(DownloadError::NotFound {
                url: url.to_owned(),
            });
        }
        fs::copy(&self.archive, dest)?;
        Ok(())
    }
}
