//! Settings file loader.
//!
//! Projects can pin their linter version and install preferences in
//! `.lintwrap.toml` at the repository root. Every key is optional: values
//! given on the command line take precedence over the file, and the file
//! takes precedence over the built-in defaults. A missing file is the same
//! as an empty one.

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::fs;
use std::io;

use lintwrap_installer::artefact::checksum::VerificationPolicy;
use lintwrap_installer::dirs::{BaseDirs, tools_root};
use lintwrap_installer::install::InstallConfig;
use lintwrap_installer::platform::Platform;
use lintwrap_installer::release::Version;

use crate::cli::Cli;
use crate::error::{ConfigError, Result};

/// Settings read from the project's settings file.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// golangci-lint version to run when `--lint-version` is absent.
    pub version: Option<String>,
    /// Tools root override; `bin/` beneath it receives installed binaries.
    pub tools_root: Option<Utf8PathBuf>,
    /// Alternative release download root, for mirrors.
    pub release_base_url: Option<String>,
    /// Accept an unversioned binary from `PATH`.
    pub use_system: bool,
    /// Verify downloaded archives against the release checksums.
    pub verify_checksum: bool,
    /// Write a default golangci configuration when none exists.
    pub init_config: bool,
}

impl Settings {
    /// Loads settings from `path`, returning defaults when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file exists but cannot be read
    /// and [`ConfigError::Parse`] when its contents are invalid.
    pub fn load(path: &Utf8Path) -> std::result::Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(source) => Self::from_toml_str(&source, path),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("no settings file at {path}; using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: path.to_owned(),
                source,
            }),
        }
    }

    /// Parses settings from TOML text; `path` is used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML, wrongly typed
    /// values and unknown keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use lintwrap::config::Settings;
    ///
    /// let settings = Settings::from_toml_str("version = \"1.55.2\"\n", Utf8Path::new("x.toml"))?;
    /// assert_eq!(settings.version.as_deref(), Some("1.55.2"));
    /// # Ok::<(), lintwrap::error::ConfigError>(())
    /// ```
    pub fn from_toml_str(source: &str, path: &Utf8Path) -> std::result::Result<Self, ConfigError> {
        toml::from_str(source).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// Combines these settings with `cli` into an install configuration.
    ///
    /// # Errors
    ///
    /// Fails when the effective version is invalid or when no tools root
    /// is configured and none can be derived from `dirs`.
    pub fn install_config(
        &self,
        cli: &Cli,
        dirs: &dyn BaseDirs,
        platform: Platform,
    ) -> Result<InstallConfig> {
        let version = match cli.lint_version.as_deref().or(self.version.as_deref()) {
            Some(value) => Version::parse(value)?,
            None => Version::default(),
        };
        let root = match cli.tools_root.as_ref().or(self.tools_root.as_ref()) {
            Some(root) => root.clone(),
            None => tools_root(dirs)?,
        };

        let mut config = InstallConfig::new(version, platform, root);
        if let Some(base_url) = &self.release_base_url {
            config.base_url.clone_from(base_url);
        }
        config.verification =
            VerificationPolicy::from_flag(cli.verify_checksum || self.verify_checksum);
        config.use_system_binary = cli.use_system || self.use_system;
        Ok(config)
    }

    /// Whether the default golangci configuration should be written.
    #[must_use]
    pub const fn init_config(&self, cli: &Cli) -> bool {
        cli.init_config || self.init_config
    }
}
