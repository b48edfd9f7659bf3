//! User-facing log output.
//!
//! Informational lines (download URLs, progress, the command being run) are
//! written to an injected sink rather than a process-wide logger, so callers
//! choose where they go and tests can capture them.

use std::io::{self, Write};

/// Write `message` followed by a newline to `log`.
///
/// Write failures are ignored: log output never decides the outcome of an
/// install or a lint run.
pub fn write_log_line(log: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(log, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

/// A sink that discards everything, used for quiet runs.
#[must_use]
pub fn quiet_sink() -> io::Sink {
    io::sink()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn appends_newline() {
        let mut log = Vec::new();
        write_log_line(&mut log, "Downloaded: /tmp/archive.tar.gz");
        assert_eq!(log, b"Downloaded: /tmp/archive.tar.gz\n");
    }

    #[test]
    fn ignores_write_failures() {
        write_log_line(&mut BrokenSink, "lost");
    }
}
