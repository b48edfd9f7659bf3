//! lintwrap CLI entrypoint.
//!
//! Installs the requested golangci-lint release when needed, then runs it
//! with the arguments given after `--` and exits with its exit code.

use clap::Parser;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::Path;

use lintwrap::args::split_passthrough;
use lintwrap::cli::Cli;
use lintwrap::config::Settings;
use lintwrap::error::{Result, RunError};
use lintwrap::golangci_config::ensure_default_config;
use lintwrap::runner::Linter;
use lintwrap_installer::dirs::SystemBaseDirs;
use lintwrap_installer::install::ensure_binary;
use lintwrap_installer::output::{quiet_sink, write_log_line};
use lintwrap_installer::platform::Platform;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let split = split_passthrough(std::env::args_os());
    let cli = match Cli::try_parse_from(&split.own) {
        Ok(cli) => cli,
        Err(err) => err.exit(),
    };

    let mut stderr = io::stderr();
    let run_result = run(&cli, split.passthrough, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    std::process::exit(exit_code);
}

fn run(cli: &Cli, passthrough: Vec<OsString>, stderr: &mut dyn Write) -> Result<i32> {
    let settings = Settings::load(cli.settings_path())?;
    let config = settings.install_config(cli, &SystemBaseDirs, Platform::current()?)?;

    if settings.init_config(cli) {
        let written = ensure_default_config(Path::new(".")).map_err(RunError::DefaultConfig)?;
        if let Some(path) = written.filter(|_| !cli.quiet) {
            write_log_line(stderr, format!("Wrote {}", path.display()));
        }
    }

    if cli.install_only {
        let mut discard = quiet_sink();
        let log: &mut dyn Write = if cli.quiet { &mut discard } else { stderr };
        let binary = ensure_binary(&config, log)?;
        write_log_line(&mut io::stdout(), binary);
        return Ok(0);
    }

    Linter::new(config).quiet(cli.quiet).lint(passthrough)
}

fn exit_code_for_run_result(result: Result<i32>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(code) => code,
        Err(err) => {
            write_log_line(stderr, err);
            1
        }
    }
}
