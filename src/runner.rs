//! Linter runner.
//!
//! A [`Linter`] is built once per invocation from an [`InstallConfig`] and
//! consumed by [`Linter::lint`], which makes sure the pinned binary is
//! installed, starts it with the caller's arguments and standard streams,
//! and returns its exit code.

use camino::Utf8Path;
use std::ffi::OsString;
use std::io::{self, Write};
use std::process::{Command, ExitStatus, Stdio};

use lintwrap_installer::artefact::download::{HttpDownloader, ReleaseDownloader};
use lintwrap_installer::artefact::extraction::{ArchiveExtractor, BinaryExtractor};
use lintwrap_installer::install::{InstallConfig, ensure_binary_with};
use lintwrap_installer::output::{quiet_sink, write_log_line};
use lintwrap_installer::release::TOOL_NAME;

use crate::error::{Result, RunError};

/// Exit code reported when the child's status carries neither a code nor a
/// signal.
const UNKNOWN_EXIT_CODE: i32 = 1;

/// Everything needed to run the linter once.
pub struct Linter {
    config: InstallConfig,
    stdin: Stdio,
    stdout: Stdio,
    stderr: Stdio,
    log: Box<dyn Write>,
    quiet: bool,
}

impl Linter {
    /// Runner inheriting this process's standard streams and logging to
    /// stderr.
    #[must_use]
    pub fn new(config: InstallConfig) -> Self {
        Self {
            config,
            stdin: Stdio::inherit(),
            stdout: Stdio::inherit(),
            stderr: Stdio::inherit(),
            log: Box::new(io::stderr()),
            quiet: false,
        }
    }

    /// Replace the streams handed to the linter process.
    #[must_use]
    pub fn with_streams(mut self, stdin: Stdio, stdout: Stdio, stderr: Stdio) -> Self {
        self.stdin = stdin;
        self.stdout = stdout;
        self.stderr = stderr;
        self
    }

    /// Replace the sink for download progress and status lines.
    #[must_use]
    pub fn with_log(mut self, log: Box<dyn Write>) -> Self {
        self.log = log;
        self
    }

    /// Discard progress and status lines.
    #[must_use]
    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Ensure the binary is installed, run it with `args` and return its
    /// exit code.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Install`] when the binary cannot be provided and
    /// [`RunError::Spawn`] when it cannot be started. A linter that runs and
    /// reports problems is not an error; its exit code is returned.
    pub fn lint<I, S>(self, args: I) -> Result<i32>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.lint_with(&HttpDownloader, &BinaryExtractor::new(TOOL_NAME), args)
    }

    /// [`Self::lint`] with an injected downloader and extractor.
    ///
    /// # Errors
    ///
    /// See [`Self::lint`].
    pub fn lint_with<I, S>(
        self,
        downloader: &dyn ReleaseDownloader,
        extractor: &dyn ArchiveExtractor,
        args: I,
    ) -> Result<i32>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let Self {
            config,
            stdin,
            stdout,
            stderr,
            mut log,
            quiet,
        } = self;
        let mut discard = quiet_sink();
        let sink: &mut dyn Write = if quiet { &mut discard } else { &mut *log };

        let binary = ensure_binary_with(&config, downloader, extractor, sink)?;
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        write_log_line(sink, command_line(&binary, &args));

        let status = Command::new(binary.as_std_path())
            .args(&args)
            .stdin(stdin)
            .stdout(stdout)
            .stderr(stderr)
            .status()
            .map_err(|source| RunError::Spawn {
                binary: binary.clone(),
                source,
            })?;
        log::debug!("{binary} exited with {status}");
        Ok(exit_code(status))
    }
}

/// Map a child's exit status to this process's exit code.
///
/// A normal exit keeps its code. On Unix a child killed by a signal maps to
/// `128 + signal`, as shells report it.
#[must_use]
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;

        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    UNKNOWN_EXIT_CODE
}

fn command_line(binary: &Utf8Path, args: &[OsString]) -> String {
    let mut line = binary.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    line
}
