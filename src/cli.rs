//! CLI argument definitions for lintwrap.
//!
//! Only the tokens before `--` are parsed here; everything after the
//! separator is forwarded to golangci-lint untouched.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;

/// Settings file consulted when `--config` is not given.
pub const DEFAULT_SETTINGS_FILE: &str = ".lintwrap.toml";

/// Run a pinned golangci-lint release.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "lintwrap")]
#[command(version, about)]
#[command(long_about = concat!(
    "Run a pinned golangci-lint release.\n\n",
    "The requested version is installed beneath the Go tools directory ",
    "($GOPATH/bin, or ~/go/bin) as golangci-lint<version>, downloading the ",
    "upstream release archive on first use. Arguments after `--` are passed ",
    "to golangci-lint unchanged and its exit code is returned.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Lint every package with the default version:\n",
    "    $ lintwrap -- run ./...\n\n",
    "  Pin a different release:\n",
    "    $ lintwrap -v 1.55.2 -- run --fix ./...\n\n",
    "  Install only and print the binary path:\n",
    "    $ lintwrap --install-only\n",
))]
pub struct Cli {
    /// golangci-lint version to run [default: 1.56.2].
    #[arg(short = 'v', long = "lint-version", value_name = "VERSION")]
    pub lint_version: Option<String>,

    /// Directory whose bin/ subdirectory holds installed binaries.
    #[arg(long, value_name = "DIR")]
    pub tools_root: Option<Utf8PathBuf>,

    /// Settings file [default: .lintwrap.toml].
    #[arg(long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Use an unversioned golangci-lint from PATH when the pinned binary is absent.
    #[arg(long)]
    pub use_system: bool,

    /// Verify the downloaded archive against the release checksums.
    #[arg(long)]
    pub verify_checksum: bool,

    /// Write a default .golangci.yml when the project has no golangci configuration.
    #[arg(long)]
    pub init_config: bool,

    /// Install the binary if needed and print its path without running it.
    #[arg(long)]
    pub install_only: bool,

    /// Suppress download progress and status output (errors still shown).
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// The settings file to load.
    #[must_use]
    pub fn settings_path(&self) -> &Utf8Path {
        self.config
            .as_deref()
            .unwrap_or_else(|| Utf8Path::new(DEFAULT_SETTINGS_FILE))
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
