//! golangci-lint installer library.
//!
//! This crate locates a pinned golangci-lint release binary under a tools
//! root, downloading and installing it from the upstream GitHub releases
//! when it is missing. It is used by the `lintwrap` binary and can be
//! consumed programmatically for testing or custom installation workflows.
//!
//! # Modules
//!
//! - [`artefact`] - Release archive download, progress, verification and extraction
//! - [`dirs`] - Tools root resolution from `GOPATH` or the home directory
//! - [`error`] - Installer error types
//! - [`install`] - Idempotent, atomic binary installation
//! - [`output`] - Log line helpers for progress and status messages
//! - [`platform`] - Operating system and architecture naming for release assets
//! - [`release`] - Version parsing, asset names, URLs and install paths

pub mod artefact;
pub mod dirs;
pub mod error;
pub mod install;
pub mod output;
pub mod platform;
pub mod release;
