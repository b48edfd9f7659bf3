//! Binary locator and installer.
//!
//! [`ensure_binary`] returns the canonical path of the requested linter
//! version, downloading and installing it first when it is missing. The
//! archive is fetched and unpacked inside a temporary directory next to
//! the final location, and the binary is renamed into place only once it
//! is complete, so concurrent callers never observe a partial file.

use camino::{Utf8Path, Utf8PathBuf};
use fs2::FileExt;
use log::debug;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::artefact::checksum::{VerificationPolicy, verify_archive};
use crate::artefact::download::{HttpDownloader, ReleaseDownloader};
use crate::artefact::extraction::{ArchiveExtractor, BinaryExtractor};
use crate::error::{InstallerError, Result};
use crate::output::write_log_line;
use crate::platform::Platform;
use crate::release::{DEFAULT_BASE_URL, Release, TOOL_NAME, Version};

/// Everything needed to locate or install one linter version.
#[derive(Debug, Clone)]
pub struct InstallConfig {
    /// The linter version to install.
    pub version: Version,
    /// The platform whose release asset is used.
    pub platform: Platform,
    /// Directory whose `bin` subdirectory holds installed binaries.
    pub tools_root: Utf8PathBuf,
    /// Release download root; see [`DEFAULT_BASE_URL`].
    pub base_url: String,
    /// Whether downloaded archives are checked against published checksums.
    pub verification: VerificationPolicy,
    /// Accept an unversioned binary already on `PATH` when the canonical
    /// path is absent.
    pub use_system_binary: bool,
}

impl InstallConfig {
    /// Configuration for `version` on `platform` using upstream releases,
    /// without checksum verification or `PATH` lookup.
    #[must_use]
    pub fn new(version: Version, platform: Platform, tools_root: Utf8PathBuf) -> Self {
        Self {
            version,
            platform,
            tools_root,
            base_url: DEFAULT_BASE_URL.to_owned(),
            verification: VerificationPolicy::default(),
            use_system_binary: false,
        }
    }

    /// The release described by this configuration.
    #[must_use]
    pub fn release(&self) -> Release<'_> {
        Release::new(&self.version, &self.platform, &self.base_url)
    }

    /// The canonical install path for this configuration.
    #[must_use]
    pub fn install_path(&self) -> Utf8PathBuf {
        self.release().install_path(&self.tools_root)
    }
}

/// Ensure the configured linter is installed using the production HTTP
/// downloader and archive extractor.
///
/// Returns the path of the executable to run.
///
/// # Errors
///
/// Returns an [`InstallerError`] describing the first failure in the
/// download, verification, extraction or install steps.
///
/// # Examples
///
/// ```no_run
/// use lintwrap_installer::dirs::{SystemBaseDirs, tools_root};
/// use lintwrap_installer::install::{InstallConfig, ensure_binary};
/// use lintwrap_installer::platform::Platform;
/// use lintwrap_installer::release::Version;
///
/// let config = InstallConfig::new(
///     Version::default(),
///     Platform::current()?,
///     tools_root(&SystemBaseDirs)?,
/// );
/// let binary = ensure_binary(&config, &mut std::io::stderr())?;
/// println!("linter available at {binary}");
/// # Ok::<(), lintwrap_installer::error::InstallerError>(())
/// ```
pub fn ensure_binary(config: &InstallConfig, log: &mut dyn Write) -> Result<Utf8PathBuf> {
    ensure_binary_with(
        config,
        &HttpDownloader,
        &BinaryExtractor::new(TOOL_NAME),
        log,
    )
}

/// Testable inner function with injected downloader and extractor.
///
/// # Errors
///
/// See [`ensure_binary`].
pub fn ensure_binary_with(
    config: &InstallConfig,
    downloader: &dyn ReleaseDownloader,
    extractor: &dyn ArchiveExtractor,
    log: &mut dyn Write,
) -> Result<Utf8PathBuf> {
    let install_path = config.install_path();
    if is_executable(install_path.as_std_path()) {
        debug!("using installed binary {install_path}");
        return Ok(install_path);
    }

    if config.use_system_binary {
        if let Some(found) = find_on_path(&config.platform)? {
            debug!("using binary from PATH {found}");
            return Ok(found);
        }
    }

    let bin_dir = parent_dir(&install_path)?;
    fs::create_dir_all(bin_dir).map_err(|source| InstallerError::Install {
        path: bin_dir.to_owned(),
        source,
    })?;

    let _lock = InstallLock::acquire(bin_dir, &install_path)?;
    if is_executable(install_path.as_std_path()) {
        debug!("{install_path} was installed by another process");
        return Ok(install_path);
    }

    install_release(config, &install_path, downloader, extractor, log)?;
    Ok(install_path)
}

/// Download, verify and extract into a staging directory, then rename the
/// binary to `install_path`.
fn install_release(
    config: &InstallConfig,
    install_path: &Utf8Path,
    downloader: &dyn ReleaseDownloader,
    extractor: &dyn ArchiveExtractor,
    log: &mut dyn Write,
) -> Result<()> {
    let release = config.release();
    debug!(
        "installing golangci-lint {} for {}",
        release.version(),
        config.platform
    );
    let bin_dir = parent_dir(install_path)?;
    let staging = tempfile::Builder::new()
        .prefix(".lintwrap-")
        .tempdir_in(bin_dir)
        .map_err(|source| InstallerError::Install {
            path: bin_dir.to_owned(),
            source,
        })?;

    let archive = downloader.download(&release.download_url(), staging.path(), log)?;

    if config.verification.require_checksum() {
        let list = downloader.download_text(&release.checksums_url())?;
        verify_archive(&archive, &list, &release.asset_name())?;
        debug!("checksum verified for {}", release.asset_name());
    }

    let staged_binary = staging.path().join(release.binary_file_name());
    extractor.extract(&archive, &staged_binary)?;

    fs::rename(&staged_binary, install_path).map_err(|source| InstallerError::Install {
        path: install_path.to_owned(),
        source,
    })?;
    write_log_line(log, format!("Installed: {install_path}"));

    if let Err(e) = staging.close() {
        debug!("failed to remove staging directory: {e}");
    }
    Ok(())
}

/// Look up the unversioned executable on `PATH`.
fn find_on_path(platform: &Platform) -> Result<Option<Utf8PathBuf>> {
    let Ok(found) = which::which(platform.executable_name(TOOL_NAME)) else {
        return Ok(None);
    };
    Utf8PathBuf::try_from(found)
        .map(Some)
        .map_err(|e| InstallerError::NonUtf8Path {
            path: e.into_path_buf(),
        })
}

fn parent_dir(path: &Utf8Path) -> Result<&Utf8Path> {
    path.parent().ok_or_else(|| InstallerError::Install {
        path: path.to_owned(),
        source: std::io::Error::other("install path has no parent directory"),
    })
}

/// Whether `path` is a regular file the current user could execute.
#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path).is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

/// Whether `path` is a regular file.
#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|meta| meta.is_file())
}

/// Advisory per-version lock serialising installers across processes.
///
/// Released when dropped.
struct InstallLock {
    file: File,
}

impl InstallLock {
    fn acquire(bin_dir: &Utf8Path, install_path: &Utf8Path) -> Result<Self> {
        let name = install_path.file_name().unwrap_or(TOOL_NAME);
        let path = bin_dir.join(format!(".{name}.lock"));
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|source| InstallerError::Lock {
                path: path.clone(),
                source,
            })?;
        file.lock_exclusive()
            .map_err(|source| InstallerError::Lock { path, source })?;
        Ok(Self { file })
    }
}

impl Drop for InstallLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            debug!("failed to release install lock: {e}");
        }
    }
}

#[cfg(test)]
#[path = "install_tests.rs"]
mod tests;
