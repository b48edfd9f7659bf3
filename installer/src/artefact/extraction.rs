//! Binary extraction from release archives.
//!
//! Release archives hold the executable next to a README and licence,
//! usually under a versioned top-level directory. Only the base name of
//! each entry matters: the last regular file whose base name starts with
//! the configured prefix is written to the destination path with its
//! archived permission bits.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use log::{debug, trace};

use crate::platform::ArchiveFormat;

/// Mode applied to zip entries that carry no Unix permissions.
const DEFAULT_MODE: u32 = 0o755;

/// Trait for extracting the linter binary from an archive, enabling test
/// mocking.
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveExtractor {
    /// Extract the binary from `archive_path` and write it to `dest_path`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::UnsupportedFormat`] for unknown archive
    /// extensions, [`ExtractionError::BinaryNotFound`] when no entry matches,
    /// and [`ExtractionError::Io`] or [`ExtractionError::Zip`] when the
    /// archive cannot be read or the destination cannot be written.
    fn extract(&self, archive_path: &Path, dest_path: &Path) -> Result<(), ExtractionError>;
}

/// Errors arising from archive extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// I/O error during extraction.
    #[error("extraction I/O error: {0}")]
    Io(#[from] io::Error),

    /// The zip container could not be read.
    #[error("invalid zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The archive extension is neither `.zip` nor `.tar.gz`.
    #[error("unsupported archive format: {}", path.display())]
    UnsupportedFormat {
        /// The archive path.
        path: PathBuf,
    },

    /// No entry in the archive matched the binary name prefix.
    #[error("no entry starting with \"{prefix}\" in {}", archive.display())]
    BinaryNotFound {
        /// The expected base-name prefix.
        prefix: String,
        /// The archive that was searched.
        archive: PathBuf,
    },
}

/// Extracts entries whose base name starts with a fixed prefix.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use lintwrap_installer::artefact::extraction::{ArchiveExtractor, BinaryExtractor};
///
/// let extractor = BinaryExtractor::new("golangci-lint");
/// extractor.extract(
///     Path::new("/tmp/golangci-lint-1.56.2-linux-amd64.tar.gz"),
///     Path::new("/tmp/golangci-lint"),
/// )?;
/// # Ok::<(), lintwrap_installer::artefact::extraction::ExtractionError>(())
/// ```
#[derive(Debug, Clone)]
pub struct BinaryExtractor {
    prefix: String,
}

impl BinaryExtractor {
    /// Create an extractor matching base names that start with `prefix`.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Whether `entry_path`'s base name starts with the prefix.
    fn matches(&self, entry_path: &Path) -> bool {
        entry_path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(&self.prefix))
    }

    fn extract_tar_gz(
        &self,
        archive_path: &Path,
        dest_path: &Path,
    ) -> Result<bool, ExtractionError> {
        let file = File::open(archive_path)?;
        let mut archive = tar::Archive::new(GzDecoder::new(file));
        let mut found = false;

        for entry_result in archive.entries()? {
            let mut entry = entry_result?;
            let entry_path = entry.path()?.into_owned();

            if !entry.header().entry_type().is_file() || !self.matches(&entry_path) {
                trace!("skipping tar entry {}", entry_path.display());
                continue;
            }

            let mode = entry.header().mode()?;
            debug!("extracting {} (mode {mode:o})", entry_path.display());
            write_entry(&mut entry, dest_path, mode)?;
            found = true;
        }

        Ok(found)
    }

    fn extract_zip(&self, archive_path: &Path, dest_path: &Path) -> Result<bool, ExtractionError> {
        let file = File::open(archive_path)?;
        let mut archive = zip::ZipArchive::new(file)?;
        let mut found = false;

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            let entry_path = PathBuf::from(entry.name());

            if entry.is_dir() || !self.matches(&entry_path) {
                trace!("skipping zip entry {}", entry_path.display());
                continue;
            }

            let mode = entry.unix_mode().unwrap_or(DEFAULT_MODE);
            debug!("extracting {} (mode {mode:o})", entry_path.display());
            write_entry(&mut entry, dest_path, mode)?;
            found = true;
        }

        Ok(found)
    }
}

impl ArchiveExtractor for BinaryExtractor {
    fn extract(&self, archive_path: &Path, dest_path: &Path) -> Result<(), ExtractionError> {
        let found = match ArchiveFormat::from_path(archive_path) {
            Some(ArchiveFormat::TarGz) => self.extract_tar_gz(archive_path, dest_path)?,
            Some(ArchiveFormat::Zip) => self.extract_zip(archive_path, dest_path)?,
            None => {
                return Err(ExtractionError::UnsupportedFormat {
                    path: archive_path.to_path_buf(),
                });
            }
        };

        if found {
            Ok(())
        } else {
            Err(ExtractionError::BinaryNotFound {
                prefix: self.prefix.clone(),
                archive: archive_path.to_path_buf(),
            })
        }
    }
}

/// Copy one archive entry to `dest_path`, truncating any previous content,
/// then apply `mode`.
fn write_entry(reader: &mut dyn Read, dest_path: &Path, mode: u32) -> Result<(), ExtractionError> {
    let mut dest = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(dest_path)?;
    io::copy(reader, &mut dest)?;
    dest.sync_all()?;
    drop(dest);
    apply_mode(dest_path, mode)?;
    Ok(())
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o7777))
}

#[cfg(not(unix))]
fn apply_mode(path: &Path, _mode: u32) -> io::Result<()> {
    // Only the read-only bit is meaningful here; release binaries are writable.
    let mut permissions = fs::metadata(path)?.permissions();
    if permissions.readonly() {
        permissions.set_readonly(false);
        fs::set_permissions(path, permissions)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "extraction_tests.rs"]
mod tests;
