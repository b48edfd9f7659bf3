//! Release naming: versions, asset names, URLs and the install path.
//!
//! All values here are pure functions of the version, the [`Platform`] and
//! the release base URL, so two processes asking for the same version agree
//! on both the download location and the installed file.

use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;

use crate::error::{InstallerError, Result};
use crate::platform::Platform;

/// Name of the wrapped tool; also the prefix of its release assets.
pub const TOOL_NAME: &str = "golangci-lint";

/// Version installed when none is requested.
pub const DEFAULT_VERSION: &str = "1.56.2";

/// Upstream release download root.
pub const DEFAULT_BASE_URL: &str = "https://github.com/golangci/golangci-lint/releases/download";

/// A validated release version, stored without a leading `v`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version(String);

impl Version {
    /// Parse a version string such as `1.56.2` or `v1.56.2`.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::InvalidVersion`] when the value is empty or
    /// contains characters other than ASCII alphanumerics, `.`, `-` and `+`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lintwrap_installer::release::Version;
    ///
    /// let version = Version::parse("v1.56.2")?;
    /// assert_eq!(version.as_str(), "1.56.2");
    /// assert!(Version::parse("../1.0").is_err());
    /// # Ok::<(), lintwrap_installer::error::InstallerError>(())
    /// ```
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        let stripped = trimmed.strip_prefix('v').unwrap_or(trimmed);

        if stripped.is_empty() {
            return Err(InstallerError::InvalidVersion {
                value: value.to_owned(),
                reason: "version must not be empty".to_owned(),
            });
        }

        if let Some(bad) = stripped
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+')))
        {
            return Err(InstallerError::InvalidVersion {
                value: value.to_owned(),
                reason: format!("unexpected character '{bad}'"),
            });
        }

        Ok(Self(stripped.to_owned()))
    }

    /// The version without a leading `v`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Version {
    fn default() -> Self {
        Self(DEFAULT_VERSION.to_owned())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One published release build for one platform.
#[derive(Debug, Clone, Copy)]
pub struct Release<'a> {
    version: &'a Version,
    platform: &'a Platform,
    base_url: &'a str,
}

impl<'a> Release<'a> {
    /// Describe the release of `version` for `platform` under `base_url`.
    #[must_use]
    pub const fn new(version: &'a Version, platform: &'a Platform, base_url: &'a str) -> Self {
        Self {
            version,
            platform,
            base_url,
        }
    }

    /// The requested version.
    #[must_use]
    pub const fn version(&self) -> &Version {
        self.version
    }

    /// File name of the release archive, e.g.
    /// `golangci-lint-1.56.2-linux-amd64.tar.gz`.
    #[must_use]
    pub fn asset_name(&self) -> String {
        format!(
            "{TOOL_NAME}-{}-{}-{}.{}",
            self.version,
            self.platform.os(),
            self.platform.arch(),
            self.platform.archive_format().extension()
        )
    }

    /// Download URL of the release archive.
    ///
    /// # Examples
    ///
    /// ```
    /// use lintwrap_installer::platform::Platform;
    /// use lintwrap_installer::release::{DEFAULT_BASE_URL, Release, Version};
    ///
    /// let version = Version::parse("1.56.2")?;
    /// let platform = Platform::new("linux", "amd64")?;
    /// let release = Release::new(&version, &platform, DEFAULT_BASE_URL);
    /// assert_eq!(
    ///     release.download_url(),
    ///     "https://github.com/golangci/golangci-lint/releases/download/v1.56.2/golangci-lint-1.56.2-linux-amd64.tar.gz",
    /// );
    /// # Ok::<(), lintwrap_installer::error::InstallerError>(())
    /// ```
    #[must_use]
    pub fn download_url(&self) -> String {
        format!("{}/{}", self.tag_url(), self.asset_name())
    }

    /// URL of the release's SHA-256 checksum list.
    #[must_use]
    pub fn checksums_url(&self) -> String {
        format!("{}/{TOOL_NAME}-{}-checksums.txt", self.tag_url(), self.version)
    }

    /// Name of the executable inside the archive, e.g. `golangci-lint.exe`.
    #[must_use]
    pub fn binary_file_name(&self) -> String {
        self.platform.executable_name(TOOL_NAME)
    }

    /// Canonical install location: `<tools_root>/bin/golangci-lint<version>`,
    /// with `.exe` appended on Windows.
    #[must_use]
    pub fn install_path(&self, tools_root: &Utf8Path) -> Utf8PathBuf {
        let stem = format!("{TOOL_NAME}{}", self.version);
        tools_root
            .join("bin")
            .join(self.platform.executable_name(&stem))
    }

    fn tag_url(&self) -> String {
        format!("{}/v{}", self.base_url.trim_end_matches('/'), self.version)
    }
}
