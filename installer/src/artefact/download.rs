//! Release archive download.
//!
//! Provides a trait-based abstraction over fetching release assets so the
//! install flow can be exercised without network access. The production
//! [`HttpDownloader`] streams the archive to disk while reporting progress
//! against the announced `Content-Length`.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use log::debug;

use super::progress::{ProgressReporter, ProgressWriter};
use crate::output::write_log_line;

/// Idle and response timeout for release downloads.
const IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on receiving a whole archive body.
const BODY_TIMEOUT: Duration = Duration::from_secs(600);

/// Trait for fetching release assets.
pub trait ReleaseDownloader {
    /// Download the archive at `url` into `dest_dir`.
    ///
    /// The file is named after the final path segment of `url`. Progress
    /// and status lines are written to `log`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the size header is missing or
    /// invalid, or the file cannot be written.
    fn download(
        &self,
        url: &str,
        dest_dir: &Path,
        log: &mut dyn Write,
    ) -> Result<PathBuf, DownloadError>;

    /// Download a small text asset, such as a checksum list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not UTF-8.
    fn download_text(&self, url: &str) -> Result<String, DownloadError>;
}

/// Errors arising from release downloads.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// HTTP request failed.
    #[error("download failed for {url}: {reason}")]
    Http {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The requested release asset does not exist (HTTP 404).
    #[error("release asset not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// The URL has no final path segment to name the archive after.
    #[error("cannot derive an archive name from {url}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
    },

    /// The response did not carry a `Content-Length` header.
    #[error("response for {url} has no Content-Length header")]
    MissingContentLength {
        /// The URL that was requested.
        url: String,
    },

    /// The `Content-Length` header is not a byte count.
    #[error("response for {url} has invalid Content-Length \"{value}\"")]
    InvalidContentLength {
        /// The URL that was requested.
        url: String,
        /// The raw header value.
        value: String,
    },

    /// The body length differs from the announced `Content-Length`.
    #[error("download of {url} received {received} of {expected} bytes")]
    SizeMismatch {
        /// The URL that was requested.
        url: String,
        /// Bytes announced by the server.
        expected: u64,
        /// Bytes actually received.
        received: u64,
    },

    /// I/O error writing the downloaded file.
    #[error("I/O error writing download: {0}")]
    Io(#[from] io::Error),
}

/// HTTP-based downloader using `ureq`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpDownloader;

impl ReleaseDownloader for HttpDownloader {
    fn download(
        &self,
        url: &str,
        dest_dir: &Path,
        log: &mut dyn Write,
    ) -> Result<PathBuf, DownloadError> {
        let dest = dest_dir.join(archive_file_name(url)?);
        write_log_line(log, format!("Download golangci-lint: {url}"));

        let response = http_agent()
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        let header = response
            .headers()
            .get("content-length")
            .map(|value| value.to_str().unwrap_or_default().to_owned());
        let expected = parse_content_length(url, header.as_deref())?;
        debug!("{url} announced {expected} bytes");

        let mut reader = response.into_body().into_reader();
        let file = File::create(&dest)?;
        copy_with_progress(url, &mut reader, file, expected, log)?;

        write_log_line(log, format!("Downloaded: {}", dest.display()));
        Ok(dest)
    }

    fn download_text(&self, url: &str) -> Result<String, DownloadError> {
        let response = http_agent()
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        response
            .into_body()
            .read_to_string()
            .map_err(|e| DownloadError::Http {
                url: url.to_owned(),
                reason: e.to_string(),
            })
    }
}

/// Copy `reader` into `file`, reporting progress against `expected` bytes.
///
/// Returns the number of bytes copied. The file is flushed and synced before
/// returning so a subsequent extraction sees the complete archive.
///
/// # Errors
///
/// Returns [`DownloadError::SizeMismatch`] when the body ends early (cleanly
/// or with a read error) or carries more than `expected` bytes, and
/// [`DownloadError::Io`] when the file cannot be written.
pub fn copy_with_progress(
    url: &str,
    reader: &mut dyn Read,
    file: File,
    expected: u64,
    log: &mut dyn Write,
) -> Result<u64, DownloadError> {
    let reporter = ProgressReporter::new(expected, log);
    let mut writer = ProgressWriter::new(file, reporter);
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(count) => count,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                debug!("body of {url} failed after {} bytes: {e}", writer.written());
                break;
            }
        };
        writer.write_all(buffer.get(..bytes_read).unwrap_or_default())?;
    }

    let received = writer.written();
    if received != expected {
        return Err(DownloadError::SizeMismatch {
            url: url.to_owned(),
            expected,
            received,
        });
    }

    writer.flush()?;
    writer.into_inner().sync_all()?;
    Ok(received)
}

/// Name the local archive after the final path segment of `url`.
fn archive_file_name(url: &str) -> Result<String, DownloadError> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    match path.rsplit_once('/') {
        Some((_, name)) if !name.is_empty() => Ok(name.to_owned()),
        _ => Err(DownloadError::InvalidUrl {
            url: url.to_owned(),
        }),
    }
}

/// Parse the announced body size.
fn parse_content_length(url: &str, header: Option<&str>) -> Result<u64, DownloadError> {
    let value = header.ok_or_else(|| DownloadError::MissingContentLength {
        url: url.to_owned(),
    })?;
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| DownloadError::InvalidContentLength {
            url: url.to_owned(),
            value: value.to_owned(),
        })
}

/// Shared `ureq` agent: no pooled keep-alive connections, bounded idle and
/// transfer time.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let config = ureq::Agent::config_builder()
            .max_idle_connections(0)
            .max_idle_age(IDLE_TIMEOUT)
            .timeout_connect(Some(IDLE_TIMEOUT))
            .timeout_recv_response(Some(IDLE_TIMEOUT))
            .timeout_recv_body(Some(BODY_TIMEOUT))
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
        other => DownloadError::Http {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}


#[cfg(test)]
#[path = "download_tests.rs"]
mod http_tests;
