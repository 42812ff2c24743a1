//! # Progress — The §6 Stderr Contract
//!
//! The CLI's progress line and closing summary are a contractual artifact
//! of the external interface, not a `tracing` diagnostic: `"  <p>%\r"`
//! during a run (only for worker 0, only when `N > 2e9` and the mode isn't
//! PRINT, per the driver's own gating), then a final `"Primes found: <n>"`
//! (or `"Sum of primes: <n>"`) and `"Seconds: <t.ttt>"` line. All of it is
//! written directly to stderr and is skipped entirely in quiet mode — it
//! mirrors the teacher's own `progress.rs`, which writes its status line
//! with a bare `eprintln!` alongside (never through) the `tracing`
//! subscriber used for internal diagnostics.

use std::io::{self, Write};
use std::time::Duration;

/// Writes the periodic `"  <p>%\r"` line. A no-op in quiet mode; tolerant
/// of a closed stderr (progress is advisory, per §4.F).
pub fn report_percent(quiet: bool, pct: u64) {
    if quiet {
        return;
    }
    let _ = write!(io::stderr(), "  {pct}%\r");
    let _ = io::stderr().flush();
}

/// What the closing summary line reports: the prime count in COUNT/PRINT
/// mode, or the inclusive sum in SUM mode.
pub enum Summary {
    Count(u64),
    Sum(u128),
}

/// Writes the final summary and elapsed-time lines, unless quiet.
pub fn report_summary(quiet: bool, summary: Summary, elapsed: Duration) {
    if quiet {
        return;
    }
    match summary {
        Summary::Count(n) => {
            eprintln!("Primes found: {n}");
        }
        Summary::Sum(s) => {
            eprintln!("Sum of primes: {s}");
        }
    }
    eprintln!("Seconds: {:.3}", elapsed.as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_percent_does_not_panic_when_quiet() {
        report_percent(true, 50);
    }

    #[test]
    fn report_percent_does_not_panic_when_verbose() {
        report_percent(false, 50);
    }

    #[test]
    fn report_summary_does_not_panic_for_count() {
        report_summary(false, Summary::Count(168), Duration::from_millis(1500));
    }

    #[test]
    fn report_summary_does_not_panic_for_sum() {
        report_summary(false, Summary::Sum(142_913_828_922), Duration::from_millis(250));
    }

    #[test]
    fn report_summary_quiet_does_not_panic() {
        report_summary(true, Summary::Count(0), Duration::from_secs(0));
    }
}
