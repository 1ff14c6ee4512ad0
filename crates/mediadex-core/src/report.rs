//! User-facing progress output, separate from the tracing log.
//!
//! A [`Verbosity`] value is passed explicitly to the walker, formatter and
//! store instead of living in process-wide state.

use std::fmt::Display;

/// Controls what gets printed to the terminal.
///
/// `verbose` and `quiet` are independent: `quiet` silences normal progress
/// lines, `verbose` enables per-node diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Verbosity {
    pub verbose: bool,
    pub quiet: bool,
}

impl Verbosity {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Silent in both channels; what library callers and tests usually want.
    pub fn silent() -> Self {
        Self {
            verbose: false,
            quiet: true,
        }
    }

    /// Normal progress line (stdout), suppressed by `--quiet`.
    pub fn progress(&self, msg: impl Display) {
        if !self.quiet {
            println!("{msg}");
        }
    }

    /// Diagnostic line (stdout), only with `--verbose`.
    pub fn detail(&self, msg: impl Display) {
        if self.verbose {
            println!("{msg}");
        }
    }

    /// Warning (stderr). Not affected by `--quiet`.
    pub fn warn(&self, msg: impl Display) {
        eprintln!("{msg}");
    }
}
