//! # CLI — Argument Parsing and Validation
//!
//! The external collaborator described in §6: bounds parsing (decimal and
//! scientific-notation integers), mode-flag resolution, and thread-count
//! resolution (`auto`/percentage/explicit). None of this is part of the
//! sieve core — the core only ever sees a validated `(f, n, mode, threads)`
//! tuple.

use clap::Parser;

use crate::segment::Mode;
use crate::{MAX_N, MAX_SUM_N};

#[derive(Parser, Debug)]
#[command(
    name = "luosieve",
    about = "Count, sum, or print primes in [F, N] with a parallel segmented wheel sieve"
)]
pub struct Cli {
    /// `N` alone, or `FROM N` — both bounds of the inclusive interval.
    /// Accepts decimal and scientific-notation integers (`1e+10`, `1.1e+10`).
    #[arg(value_name = "BOUNDS", num_args = 1..=2, required = true)]
    pub bounds: Vec<String>,

    /// Emit primes to standard output, one per line.
    #[arg(short = 'p', long = "print")]
    pub print: bool,

    /// Emit the inclusive sum of primes in [F, N] (requires N <= 29505444490).
    #[arg(short = 's', long = "sum")]
    pub sum: bool,

    /// Suppress progress and summary output on standard error.
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Worker count: an integer, a percentage of logical cores (e.g. `50%`),
    /// or `auto`. Defaults to `100%` (one worker per logical core).
    #[arg(long = "maxworkers", visible_alias = "threads", default_value = "100%")]
    pub maxworkers: String,
}

/// Parses a single bound: plain decimal, or scientific notation
/// (`1e10`, `1e+10`, `1.1e+10`). Rejects negative numbers, fractions that
/// don't resolve to an integer, and values that overflow `u64`.
pub fn parse_int(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty integer".to_string());
    }
    if let Some(idx) = s.find(['e', 'E']) {
        parse_scientific(&s[..idx], &s[idx + 1..])
    } else {
        s.parse::<u64>().map_err(|e| format!("invalid integer {s:?}: {e}"))
    }
}

fn parse_scientific(mantissa: &str, exp_str: &str) -> Result<u64, String> {
    let exp_str = exp_str.trim_start_matches('+');
    let exp: i64 = exp_str
        .parse()
        .map_err(|e| format!("invalid exponent {exp_str:?}: {e}"))?;

    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((i, f)) => (i, f),
        None => (mantissa, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(format!("invalid mantissa {mantissa:?}"));
    }

    let mut digits = String::with_capacity(int_part.len() + frac_part.len());
    digits.push_str(int_part);
    digits.push_str(frac_part);
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("invalid mantissa {mantissa:?}"));
    }

    let shift = exp - frac_part.len() as i64;
    if shift < 0 {
        return Err(format!("{mantissa}e{exp_str} is not an integer"));
    }
    if shift > 30 {
        return Err(format!("{mantissa}e{exp_str} exceeds u64 range"));
    }

    let digits_val: u128 = digits
        .parse()
        .map_err(|e| format!("invalid mantissa {mantissa:?}: {e}"))?;
    let scale = 10u128.pow(shift as u32);
    let value = digits_val
        .checked_mul(scale)
        .ok_or_else(|| format!("{mantissa}e{exp_str} exceeds u64 range"))?;
    u64::try_from(value).map_err(|_| format!("{mantissa}e{exp_str} exceeds u64 range"))
}

/// Resolves the `BOUNDS` positionals into `(f, n)`: one value means `f = 1`;
/// two values are `from` and `n` in that order.
pub fn parse_bounds(raw: &[String]) -> Result<(u64, u64), String> {
    match raw {
        [n] => Ok((1, parse_int(n)?)),
        [from, n] => Ok((parse_int(from)?, parse_int(n)?)),
        _ => Err("expected `N` or `FROM N`".to_string()),
    }
}

/// Validates `(f, n)` and the sum-mode bound per §6: `N` within range,
/// `F >= 1`, `N >= F`, and (when summing) `N <= MAX_SUM_N`.
pub fn validate(f: u64, n: u64, sum: bool) -> Result<(), String> {
    if n > MAX_N {
        return Err(format!("N={n} exceeds the maximum of {MAX_N}"));
    }
    if f < 1 {
        return Err("F must be >= 1".to_string());
    }
    if n < f {
        return Err(format!("N={n} must be >= F={f}"));
    }
    if sum && n > MAX_SUM_N {
        return Err(format!(
            "--sum requires N <= {MAX_SUM_N} (64-bit sum may overflow beyond it)"
        ));
    }
    Ok(())
}

/// Resolves print/sum flags into a sieving mode. Rejects `-p` and `-s`
/// together: each selects a distinct, mutually exclusive emission path.
pub fn resolve_mode(print: bool, sum: bool) -> Result<Mode, String> {
    match (print, sum) {
        (true, true) => Err("--print and --sum are mutually exclusive".to_string()),
        (true, false) => Ok(Mode::Print),
        (false, true) => Ok(Mode::Sum),
        (false, false) => Ok(Mode::Count),
    }
}

/// A parsed `--maxworkers`/`--threads` value, not yet resolved against the
/// host's logical core count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThreadSpec {
    Auto,
    Percent(u64),
    Count(u64),
}

/// Parses `auto`, `NN%`, or a plain integer worker count.
pub fn parse_threads(s: &str) -> Result<ThreadSpec, String> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("auto") {
        return Ok(ThreadSpec::Auto);
    }
    if let Some(pct) = s.strip_suffix('%') {
        let pct: u64 = pct
            .parse()
            .map_err(|e| format!("invalid worker percentage {s:?}: {e}"))?;
        return Ok(ThreadSpec::Percent(pct));
    }
    let count: u64 = s
        .parse()
        .map_err(|e| format!("invalid worker count {s:?}: {e}"))?;
    Ok(ThreadSpec::Count(count))
}

/// Resolves a `ThreadSpec` against the host's logical core count, always
/// returning at least 1.
pub fn resolve_threads(spec: ThreadSpec, logical_cores: u64) -> u64 {
    match spec {
        ThreadSpec::Auto => logical_cores.max(1),
        ThreadSpec::Percent(pct) => ((logical_cores * pct + 50) / 100).max(1),
        ThreadSpec::Count(n) => n.max(1),
    }
}
