//! Splitting the command line into this tool's flags and linter arguments.

use std::ffi::OsString;

/// Separator between this tool's flags and the arguments forwarded to the
/// linter.
pub const SEPARATOR: &str = "--";

/// Command-line tokens divided at the first [`SEPARATOR`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitArgs {
    /// Tokens before the separator, including the program name.
    pub own: Vec<OsString>,
    /// Tokens after the separator, forwarded verbatim and in order.
    pub passthrough: Vec<OsString>,
}

/// Split `args` at the first `--`.
///
/// Any later `--` tokens belong to the linter and are kept. Without a
/// separator every token goes to [`SplitArgs::own`].
///
/// # Examples
///
/// ```
/// use lintwrap::args::split_passthrough;
///
/// let split = split_passthrough(["lintwrap", "-v", "1.56.2", "--", "run", "./..."]);
/// assert_eq!(split.own, ["lintwrap", "-v", "1.56.2"]);
/// assert_eq!(split.passthrough, ["run", "./..."]);
/// ```
pub fn split_passthrough<I, T>(args: I) -> SplitArgs
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut tokens = args.into_iter().map(Into::into);
    let own = tokens.by_ref().take_while(|arg| arg != SEPARATOR).collect();
    let passthrough = tokens.collect();
    SplitArgs { own, passthrough }
}
