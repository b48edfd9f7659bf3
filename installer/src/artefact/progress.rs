//! Download progress reporting.
//!
//! Progress output is cosmetic: it is written to the log sink on a single
//! line (`Progress: 12% 47% 100%`) and write failures are ignored. The only
//! guarantee is that ` 100%` is printed exactly when the received byte
//! count reaches the expected total.

use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Minimum time between two percentage updates.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Tracks received bytes against an expected total and reports percentages.
///
/// Nothing is written until the first non-empty chunk arrives, so an empty
/// transfer (a total of zero) stays silent.
pub struct ProgressReporter<'a> {
    total: u64,
    received: u64,
    last_emit: Option<Instant>,
    interval: Duration,
    log: &'a mut dyn Write,
}

impl<'a> ProgressReporter<'a> {
    /// Create a reporter for a transfer of `total` bytes.
    pub fn new(total: u64, log: &'a mut dyn Write) -> Self {
        Self::with_interval(total, DEFAULT_INTERVAL, log)
    }

    /// Create a reporter with a custom throttling interval.
    pub fn with_interval(total: u64, interval: Duration, log: &'a mut dyn Write) -> Self {
        Self {
            total,
            received: 0,
            last_emit: None,
            interval,
            log,
        }
    }

    /// Bytes received so far.
    #[must_use]
    pub const fn received(&self) -> u64 {
        self.received
    }

    /// Record `bytes` more bytes and emit progress if due.
    pub fn advance(&mut self, bytes: u64) {
        if bytes == 0 {
            return;
        }

        if self.received == 0 {
            self.emit(format_args!("Progress:"));
        }

        self.received = self.received.saturating_add(bytes);

        if self.received == self.total {
            self.emit(format_args!(" 100%\n"));
            return;
        }

        let now = Instant::now();
        let throttled = self
            .last_emit
            .is_some_and(|last| now.duration_since(last) < self.interval);
        if throttled {
            return;
        }

        self.last_emit = Some(now);
        let percent = self.percent();
        self.emit(format_args!(" {percent:02}%"));
    }

    fn percent(&self) -> u64 {
        self.received
            .saturating_mul(100)
            .checked_div(self.total)
            .map_or(100, |percent| percent.min(100))
    }

    fn emit(&mut self, args: std::fmt::Arguments<'_>) {
        if self.log.write_fmt(args).is_err() {
            // Progress is best-effort; a broken log sink must not fail the download.
        }
    }
}

/// A byte sink that reports every accepted write to a [`ProgressReporter`].
pub struct ProgressWriter<'a, W> {
    inner: W,
    reporter: ProgressReporter<'a>,
}

impl<'a, W: Write> ProgressWriter<'a, W> {
    /// Wrap `inner`, reporting against `reporter`.
    pub const fn new(inner: W, reporter: ProgressReporter<'a>) -> Self {
        Self { inner, reporter }
    }

    /// Total bytes written through this wrapper.
    #[must_use]
    pub const fn written(&self) -> u64 {
        self.reporter.received()
    }

    /// Unwrap the inner sink.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for ProgressWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.reporter.advance(written as u64);
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEVER: Duration = Duration::from_secs(3600);

    fn render(total: u64, interval: Duration, chunks: &[u64]) -> String {
        let mut log = Vec::new();
        {
            let mut reporter = ProgressReporter::with_interval(total, interval, &mut log);
            for chunk in chunks {
                reporter.advance(*chunk);
            }
        }
        String::from_utf8(log).expect("progress output is UTF-8")
    }

    #[test]
    fn reports_every_chunk_without_throttling() {
        let output = render(10, Duration::ZERO, &[2, 3, 5]);
        assert_eq!(output, "Progress: 20% 50% 100%\n");
    }

    #[test]
    fn throttles_intermediate_updates() {
        let output = render(10, NEVER, &[2, 3, 4, 1]);
        assert_eq!(output, "Progress: 20% 100%\n");
    }

    #[test]
    fn single_chunk_completes_immediately() {
        let output = render(4, NEVER, &[4]);
        assert_eq!(output, "Progress: 100%\n");
    }

    #[test]
    fn completion_marker_waits_for_exact_total() {
        let output = render(100, NEVER, &[1, 98]);
        assert!(!output.contains("100%"), "premature completion: {output}");

        let completed = render(100, NEVER, &[1, 98, 1]);
        assert!(completed.ends_with(" 100%\n"), "output: {completed}");
    }

    #[test]
    fn small_percentages_are_zero_padded() {
        let output = render(1000, Duration::ZERO, &[5]);
        assert_eq!(output, "Progress: 00%");
    }

    #[test]
    fn zero_length_writes_are_silent() {
        let output = render(10, Duration::ZERO, &[0, 0]);
        assert!(output.is_empty());
    }

    #[test]
    fn empty_transfer_prints_nothing() {
        assert!(render(0, Duration::ZERO, &[]).is_empty());
        assert!(render(0, Duration::ZERO, &[0]).is_empty());
    }

    #[test]
    fn writer_forwards_bytes_and_reports() {
        let mut log = Vec::new();
        let reporter = ProgressReporter::with_interval(5, NEVER, &mut log);
        let mut writer = ProgressWriter::new(Vec::new(), reporter);

        writer.write_all(b"hello").expect("write");
        assert_eq!(writer.written(), 5);
        let sink = writer.into_inner();

        assert_eq!(sink, b"hello");
        assert_eq!(String::from_utf8(log).expect("UTF-8"), "Progress: 100%\n");
    }
}
