//! lintwrap: run a pinned golangci-lint release.
//!
//! The binary splits its command line at `--`, resolves the requested
//! linter version from flags and the optional `.lintwrap.toml`, installs the
//! release on first use through [`lintwrap_installer`] and then runs it with
//! the forwarded arguments, returning the linter's exit code.
//!
//! # Modules
//!
//! - [`args`] - Splitting own flags from forwarded arguments
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Settings file loading and precedence
//! - [`error`] - Error types for settings and runs
//! - [`golangci_config`] - Default golangci configuration writer
//! - [`runner`] - Running the installed linter

pub mod args;
pub mod cli;
pub mod config;
pub mod error;
pub mod golangci_config;
pub mod runner;

pub use config::Settings;
pub use runner::Linter;
