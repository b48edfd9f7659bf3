//! Error types for settings loading and lint runs.

use camino::Utf8PathBuf;
use lintwrap_installer::error::InstallerError;
use std::io;
use thiserror::Error;

/// Errors raised while loading the settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file exists but could not be read.
    #[error("failed to read settings file {path}: {source}")]
    Read {
        /// The settings file path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// The settings file is not valid TOML or contains unknown keys.
    #[error("invalid settings file {path}: {source}")]
    Parse {
        /// The settings file path.
        path: Utf8PathBuf,
        /// The parser error.
        source: toml::de::Error,
    },
}

/// Errors that abort a lint run before the linter's own exit code is known.
#[derive(Debug, Error)]
pub enum RunError {
    /// The settings file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The linter binary could not be located or installed.
    #[error(transparent)]
    Install(#[from] InstallerError),

    /// The linter process could not be started.
    #[error("failed to launch {binary}: {source}")]
    Spawn {
        /// The binary that failed to start.
        binary: Utf8PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// The default golangci configuration could not be written.
    #[error("failed to write default golangci configuration: {0}")]
    DefaultConfig(#[source] io::Error),
}

/// Result alias for lint runs.
pub type Result<T> = std::result::Result<T, RunError>;
