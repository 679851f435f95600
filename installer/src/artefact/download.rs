//! Release archive download.
//!
//! Provides a trait-based abstraction over HTTP retrieval so the installer
//! can be exercised without network access. There is no retry: a failed
//! transfer is reported to the caller as-is.

use log::debug;
use std::io::{ErrorKind, Read, Write};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

/// Network timeout for a single archive download.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(600);

/// Trait for fetching a URL into a local file.
///
/// # Examples
///
/// ```no_run
/// use stagehand_installer::artefact::download::{ArtefactDownloader, HttpDownloader};
///
/// let downloader = HttpDownloader;
/// downloader.download(
///     "https://bitcoincore.org/bin/bitcoin-core-27.0/SHA256SUMS",
///     std::path::Path::new("/tmp/SHA256SUMS"),
/// )?;
/// # Ok::<(), stagehand_installer::artefact::download::DownloadError>(())
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ArtefactDownloader {
    /// Download `url` and write the body to `dest`.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::NotFound`] for HTTP 404,
    /// [`DownloadError::HttpError`] for other transport or status failures,
    /// and [`DownloadError::Io`] if `dest` cannot be written.
    fn download(&self, url: &str, dest: &Path) -> Result<(), DownloadError>;
}

/// Errors arising from archive download.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// HTTP request failed.
    #[error("download failed for {url}: {reason}")]
    HttpError {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The requested archive was not found (HTTP 404).
    #[error("release archive not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// I/O error writing the downloaded file.
    #[error("I/O error writing download: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP downloader using `ureq`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpDownloader;

impl ArtefactDownloader for HttpDownloader {
    fn download(&self, url: &str, dest: &Path) -> Result<(), DownloadError> {
        debug!("downloading {url} to {}", dest.display());
        let response = http_agent()
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        let mut file = std::fs::File::create(dest)?;
        let bytes = copy_body(url, &mut response.into_body().as_reader(), &mut file)?;
        debug!("downloaded {bytes} bytes from {url}");
        Ok(())
    }
}

/// Stream a response body into `sink`.
///
/// Failures reading the body are transfer errors; failures writing the
/// local file are [`DownloadError::Io`].
fn copy_body(
    url: &str,
    body: &mut dyn Read,
    sink: &mut dyn Write,
) -> Result<u64, DownloadError> {
    let mut buffer = [0_u8; 64 * 1024];
    let mut total = 0_u64;
    loop {
        let read = match body.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => {
                return Err(DownloadError::HttpError {
                    url: url.to_owned(),
                    reason: err.to_string(),
                });
            }
        };
        sink.write_all(&buffer[..read])?;
        total += read as u64;
    }
    sink.flush()?;
    Ok(total)
}

/// Shared `ureq` agent with request timeout configuration.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(DOWNLOAD_TIMEOUT))
            .build();
        ureq::Agent::new_with_config(config)
    })
}

/// Map a ureq error to a [`DownloadError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> DownloadError {
    match err {
        ureq::Error::StatusCode(404) => DownloadError::NotFound {
            url: url.to_owned(),
        },
        other => DownloadError::HttpError {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}
