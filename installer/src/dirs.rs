//! Tools-root resolution.
//!
//! Binaries are installed beneath the Go workspace root, mirroring where
//! `go install` places tools: the first entry of `GOPATH` when set, and
//! `<home>/go` otherwise. Directory lookups go through [`BaseDirs`] so tests
//! can substitute fixed locations.

use camino::Utf8PathBuf;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::{InstallerError, Result};

/// Abstraction over the host directories consulted during resolution.
pub trait BaseDirs {
    /// The current user's home directory.
    fn home_dir(&self) -> Option<PathBuf>;

    /// The raw value of the `GOPATH` environment variable.
    fn gopath(&self) -> Option<OsString>;
}

/// Production [`BaseDirs`] backed by `directories-next` and the process
/// environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBaseDirs;

impl BaseDirs for SystemBaseDirs {
    fn home_dir(&self) -> Option<PathBuf> {
        directories_next::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
    }

    fn gopath(&self) -> Option<OsString> {
        std::env::var_os("GOPATH")
    }
}

/// Resolve the directory whose `bin` subdirectory receives installed tools.
///
/// # Errors
///
/// Returns [`InstallerError::ToolsRootUnavailable`] when neither `GOPATH`
/// nor a home directory is available, and [`InstallerError::NonUtf8Path`]
/// when the resolved root is not valid UTF-8.
///
/// # Examples
///
/// ```no_run
/// use lintwrap_installer::dirs::{SystemBaseDirs, tools_root};
///
/// let root = tools_root(&SystemBaseDirs)?;
/// println!("tools are installed under {root}/bin");
/// # Ok::<(), lintwrap_installer::error::InstallerError>(())
/// ```
pub fn tools_root(dirs: &dyn BaseDirs) -> Result<Utf8PathBuf> {
    let root = first_gopath_entry(dirs)
        .or_else(|| dirs.home_dir().map(|home| home.join("go")))
        .ok_or_else(|| InstallerError::ToolsRootUnavailable {
            reason: "GOPATH is unset and no home directory was found".to_owned(),
        })?;

    Utf8PathBuf::try_from(root).map_err(|e| InstallerError::NonUtf8Path {
        path: e.into_path_buf(),
    })
}

fn first_gopath_entry(dirs: &dyn BaseDirs) -> Option<PathBuf> {
    let gopath = dirs.gopath()?;
    std::env::split_paths(&gopath).find(|entry| !entry.as_os_str().is_empty())
}
