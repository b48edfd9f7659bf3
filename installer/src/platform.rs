//! Platform descriptor for release selection.
//!
//! Everything that varies by host (release OS and architecture names, the
//! archive format published for that OS, and the executable suffix) is
//! computed once into a [`Platform`] value and threaded through the
//! installer, rather than being re-derived by each caller.

use std::fmt;
use std::path::Path;

use crate::error::{InstallerError, Result};

/// Operating system names used in upstream release asset names.
const SUPPORTED_OS: &[&str] = &[
    "linux", "darwin", "windows", "freebsd", "netbsd", "openbsd", "illumos", "solaris",
];

/// Architecture names used in upstream release asset names.
const SUPPORTED_ARCH: &[&str] = &[
    "amd64", "386", "arm64", "armv6", "armv7", "ppc64le", "ppc64", "s390x", "riscv64", "mips64",
    "mips64le", "loong64",
];

/// Compressed archive format of a release asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// A gzip-compressed tarball (`.tar.gz`).
    TarGz,
    /// A zip archive (`.zip`).
    Zip,
}

impl ArchiveFormat {
    /// File extension used for this format, without the leading dot.
    ///
    /// # Examples
    ///
    /// ```
    /// use lintwrap_installer::platform::ArchiveFormat;
    ///
    /// assert_eq!(ArchiveFormat::TarGz.extension(), "tar.gz");
    /// assert_eq!(ArchiveFormat::Zip.extension(), "zip");
    /// ```
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::TarGz => "tar.gz",
            Self::Zip => "zip",
        }
    }

    /// Detect the archive format from a file name.
    ///
    /// Returns `None` for anything that is not `.zip`, `.tar.gz` or `.tgz`.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_ascii_lowercase();
        if name.ends_with(".zip") {
            Some(Self::Zip)
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(Self::TarGz)
        } else {
            None
        }
    }
}

/// The host description used to pick and name release assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    os: String,
    arch: String,
}

impl Platform {
    /// Build a descriptor from release-style OS and architecture names.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::UnsupportedPlatform`] when either name is
    /// not one the upstream project publishes binaries for.
    ///
    /// # Examples
    ///
    /// ```
    /// use lintwrap_installer::platform::{ArchiveFormat, Platform};
    ///
    /// let platform = Platform::new("windows", "amd64")?;
    /// assert_eq!(platform.archive_format(), ArchiveFormat::Zip);
    /// assert_eq!(platform.executable_name("golangci-lint"), "golangci-lint.exe");
    /// # Ok::<(), lintwrap_installer::error::InstallerError>(())
    /// ```
    pub fn new(os: &str, arch: &str) -> Result<Self> {
        if !SUPPORTED_OS.contains(&os) || !SUPPORTED_ARCH.contains(&arch) {
            return Err(InstallerError::UnsupportedPlatform {
                os: os.to_owned(),
                arch: arch.to_owned(),
            });
        }
        Ok(Self {
            os: os.to_owned(),
            arch: arch.to_owned(),
        })
    }

    /// Describe the running host.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::UnsupportedPlatform`] when the host OS or
    /// architecture has no published release.
    pub fn current() -> Result<Self> {
        let os = std::env::consts::OS;
        let arch = std::env::consts::ARCH;
        let little_endian = cfg!(target_endian = "little");

        match (release_os_name(os), release_arch_name(arch, little_endian)) {
            (Some(release_os), Some(release_arch)) => Self::new(release_os, release_arch),
            _ => Err(InstallerError::UnsupportedPlatform {
                os: os.to_owned(),
                arch: arch.to_owned(),
            }),
        }
    }

    /// Release-style OS name, e.g. `linux` or `darwin`.
    #[must_use]
    pub fn os(&self) -> &str {
        &self.os
    }

    /// Release-style architecture name, e.g. `amd64` or `arm64`.
    #[must_use]
    pub fn arch(&self) -> &str {
        &self.arch
    }

    /// Whether this descriptor targets Windows.
    #[must_use]
    pub fn is_windows(&self) -> bool {
        self.os == "windows"
    }

    /// Archive format published for this OS.
    #[must_use]
    pub fn archive_format(&self) -> ArchiveFormat {
        if self.is_windows() {
            ArchiveFormat::Zip
        } else {
            ArchiveFormat::TarGz
        }
    }

    /// Suffix appended to executable file names (`.exe` on Windows).
    #[must_use]
    pub fn executable_suffix(&self) -> &'static str {
        if self.is_windows() { ".exe" } else { "" }
    }

    /// Append the executable suffix to `stem`.
    #[must_use]
    pub fn executable_name(&self, stem: &str) -> String {
        format!("{stem}{}", self.executable_suffix())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

/// Map a Rust `std::env::consts::OS` value to its release name.
fn release_os_name(os: &str) -> Option<&'static str> {
    match os {
        "linux" => Some("linux"),
        "macos" => Some("darwin"),
        "windows" => Some("windows"),
        "freebsd" => Some("freebsd"),
        "netbsd" => Some("netbsd"),
        "openbsd" => Some("openbsd"),
        "illumos" => Some("illumos"),
        "solaris" => Some("solaris"),
        _ => None,
    }
}

/// Map a Rust `std::env::consts::ARCH` value to its release name.
fn release_arch_name(arch: &str, little_endian: bool) -> Option<&'static str> {
    match (arch, little_endian) {
        ("x86_64", _) => Some("amd64"),
        ("x86", _) => Some("386"),
        ("aarch64", _) => Some("arm64"),
        ("arm", _) => Some("armv6"),
        ("powerpc64", true) => Some("ppc64le"),
        ("powerpc64", false) => Some("ppc64"),
        ("s390x", _) => Some("s390x"),
        ("riscv64", _) => Some("riscv64"),
        ("mips64", true) => Some("mips64le"),
        ("mips64", false) => Some("mips64"),
        ("loongarch64", _) => Some("loong64"),
        _ => None,
    }
}
