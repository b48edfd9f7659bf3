//! Error types for locating and installing the linter binary.
//!
//! Every failure in the fetch, verify, extract and install sequence is
//! surfaced through [`InstallerError`]. Callers do not retry; the error is
//! reported once and the run is aborted.

use camino::Utf8PathBuf;
use std::path::PathBuf;
use thiserror::Error;

use crate::artefact::checksum::ChecksumError;
use crate::artefact::download::DownloadError;
use crate::artefact::extraction::ExtractionError;

/// Errors that can occur while ensuring the linter binary is installed.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// No release is published for the host operating system or architecture.
    #[error("unsupported platform {os}/{arch}")]
    UnsupportedPlatform {
        /// The rejected operating system name.
        os: String,
        /// The rejected architecture name.
        arch: String,
    },

    /// The requested version cannot be used in a release URL or file name.
    #[error("invalid version \"{value}\": {reason}")]
    InvalidVersion {
        /// The rejected version string.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// The tools root directory could not be determined.
    #[error("could not determine tools root: {reason}")]
    ToolsRootUnavailable {
        /// Description of why resolution failed.
        reason: String,
    },

    /// A path is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", path.display())]
    NonUtf8Path {
        /// The offending path.
        path: PathBuf,
    },

    /// Downloading the release archive failed.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// Extracting the binary from the archive failed.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// The archive did not match the published checksum.
    #[error(transparent)]
    Checksum(#[from] ChecksumError),

    /// The install lock could not be acquired.
    #[error("failed to lock {path}: {source}")]
    Lock {
        /// The lock file path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A filesystem operation on the install location failed.
    #[error("failed to install {path}: {source}")]
    Install {
        /// The path being created or written.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// Result type alias using [`InstallerError`].
pub type Result<T> = std::result::Result<T, InstallerError>;
