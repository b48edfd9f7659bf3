//! Release artefact handling: download, progress, verification, extraction.
//!
//! # Sub-modules
//!
//! - [`checksum`] - Optional SHA-256 verification against the release list.
//! - [`download`] - Release downloader trait and HTTP implementation.
//! - [`extraction`] - Prefix-matched binary extraction from zip and tar.gz.
//! - [`progress`] - Percentage reporting for streamed downloads.

pub mod checksum;
pub mod download;
pub mod extraction;
pub mod progress;
