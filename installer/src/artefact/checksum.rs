//! Optional SHA-256 verification of downloaded release archives.
//!
//! Each upstream release publishes a `checksums.txt` listing
//! `<sha256>  <asset name>` per line. Verification is opt-in so the default
//! install path performs a single request.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Whether archives must be checked against the published checksums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerificationPolicy {
    /// Install without consulting the checksum list.
    #[default]
    Skip,
    /// Download the checksum list and reject mismatching archives.
    RequireChecksum,
}

impl VerificationPolicy {
    /// Build a policy from a boolean flag.
    #[must_use]
    pub const fn from_flag(verify: bool) -> Self {
        if verify {
            Self::RequireChecksum
        } else {
            Self::Skip
        }
    }

    /// Whether checksum verification is required.
    #[must_use]
    pub const fn require_checksum(self) -> bool {
        matches!(self, Self::RequireChecksum)
    }
}

/// Errors arising from checksum verification.
#[derive(Debug, thiserror::Error)]
pub enum ChecksumError {
    /// The checksum list has no line for the asset.
    #[error("checksum list has no entry for {asset}")]
    EntryMissing {
        /// The asset that was looked up.
        asset: String,
    },

    /// The archive digest differs from the published one.
    #[error("checksum mismatch for {asset}: expected {expected}, got {actual}")]
    Mismatch {
        /// The asset that was verified.
        asset: String,
        /// The published digest.
        expected: String,
        /// The digest of the downloaded file.
        actual: String,
    },

    /// The archive could not be read.
    #[error("failed to hash archive: {0}")]
    Io(#[from] io::Error),
}

/// Find the published digest for `asset` in a checksum list.
///
/// # Examples
///
/// ```
/// use lintwrap_installer::artefact::checksum::find_checksum;
///
/// let list = "abc123  golangci-lint-1.56.2-linux-amd64.tar.gz\n";
/// assert_eq!(
///     find_checksum(list, "golangci-lint-1.56.2-linux-amd64.tar.gz"),
///     Some("abc123"),
/// );
/// ```
#[must_use]
pub fn find_checksum<'a>(list: &'a str, asset: &str) -> Option<&'a str> {
    list.lines().find_map(|line| {
        let mut fields = line.split_whitespace();
        let digest = fields.next()?;
        let name = fields.next()?.trim_start_matches('*');
        (name == asset).then_some(digest)
    })
}

/// Compute the lowercase hex SHA-256 digest of a file.
///
/// # Errors
///
/// Returns any I/O error raised while reading the file.
pub fn sha256_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(buffer.get(..bytes_read).unwrap_or_default());
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Verify `archive` against the digest listed for `asset`.
///
/// # Errors
///
/// Returns [`ChecksumError::EntryMissing`] when `asset` is not listed,
/// [`ChecksumError::Mismatch`] when the digests differ, and
/// [`ChecksumError::Io`] when the archive cannot be read.
pub fn verify_archive(archive: &Path, list: &str, asset: &str) -> Result<(), ChecksumError> {
    let expected = find_checksum(list, asset).ok_or_else(|| ChecksumError::EntryMissing {
        asset: asset.to_owned(),
    })?;
    let actual = sha256_file(archive)?;
    if actual.eq_ignore_ascii_case(expected) {
        Ok(())
    } else {
        Err(ChecksumError::Mismatch {
            asset: asset.to_owned(),
            expected: expected.to_owned(),
            actual,
        })
    }
}
