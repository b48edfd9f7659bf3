//! Default golangci-lint configuration for projects that have none.

use log::debug;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// File name the default configuration is written to.
pub const DEFAULT_CONFIG_FILE: &str = ".golangci.yml";

/// Configuration file names golangci-lint discovers in a project directory.
pub const CONFIG_FILE_NAMES: [&str; 4] = [
    ".golangci.yml",
    ".golangci.yaml",
    ".golangci.toml",
    ".golangci.json",
];

/// Default configuration: a small set of extra linters with the upstream
/// default exclusions disabled.
pub const DEFAULT_CONFIG: &str = "\
run:
  skip-dirs-use-default: false

linters:
  enable:
    - gofmt
    - golint
    - gocyclo
    - misspell
    - bodyclose

gocyclo:
  min-complexity: 15

issues:
  exclude-use-default: false
";

/// Returns the first golangci configuration file present in `dir`.
#[must_use]
pub fn find_existing_config(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Writes [`DEFAULT_CONFIG`] to `dir/.golangci.yml` unless a configuration
/// already exists.
///
/// Returns the path written, or `None` when an existing file was kept.
///
/// # Errors
///
/// Returns any I/O error raised while creating or writing the file.
pub fn ensure_default_config(dir: &Path) -> io::Result<Option<PathBuf>> {
    if let Some(existing) = find_existing_config(dir) {
        debug!("keeping existing golangci configuration {}", existing.display());
        return Ok(None);
    }

    let path = dir.join(DEFAULT_CONFIG_FILE);
    let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => return Ok(None),
        Err(err) => return Err(err),
    };
    file.write_all(DEFAULT_CONFIG.as_bytes())?;
    Ok(Some(path))
}
