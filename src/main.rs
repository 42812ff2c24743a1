//! # Main — CLI Entry Point
//!
//! Parses arguments, validates bounds, resolves the worker count, and hands
//! everything to [`luosieve::driver::run`]. Prints the §6-mandated progress
//! line and closing summary to stderr (unless `--quiet`), and maps the
//! result to the documented exit codes: `0` if at least one prime was
//! found, `1` if none were, `>1` on error.

use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use luosieve::cli::{self, Cli};
use luosieve::error::{exit_code_for, SieveError};
use luosieve::output::{buffered_stdout, OrderedSink};
use luosieve::progress::{report_percent, report_summary, Summary};
use luosieve::segment::Mode;
use luosieve::{driver, MAX_N};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    match run(cli) {
        Ok(found) => {
            if found {
                ExitCode::from(0)
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            eprintln!("luosieve: {e}");
            ExitCode::from(exit_code_for(&e) as u8)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

/// Runs one sieve invocation; returns whether at least one prime was found.
fn run(cli: Cli) -> luosieve::error::Result<bool> {
    let (f, n) = cli::parse_bounds(&cli.bounds).map_err(SieveError::InputError)?;
    cli::validate(f, n, cli.sum).map_err(SieveError::InputError)?;
    let mode = cli::resolve_mode(cli.print, cli.sum).map_err(SieveError::InputError)?;

    let spec = cli::parse_threads(&cli.maxworkers).map_err(SieveError::InputError)?;
    let logical_cores = std::thread::available_parallelism()
        .map(|cores| cores.get() as u64)
        .unwrap_or(1);
    let threads = cli::resolve_threads(spec, logical_cores);

    debug_assert!(n <= MAX_N);

    let start = Instant::now();
    let quiet = cli.quiet;

    let stdout_sink = if mode == Mode::Print {
        Some(OrderedSink::new(buffered_stdout()))
    } else {
        None
    };

    let outcome = driver::run(f, n, threads, mode, stdout_sink.as_ref(), |pct| {
        report_percent(quiet, pct);
    })?;

    if let Some(sink) = stdout_sink {
        use std::io::Write;
        let mut writer = sink.into_inner().map_err(SieveError::IOError)?;
        writer.flush().map_err(SieveError::IOError)?;
    }

    let elapsed = start.elapsed();
    let summary = match mode {
        Mode::Sum => Summary::Sum(outcome.sum),
        Mode::Count | Mode::Print => Summary::Count(outcome.count),
    };
    report_summary(quiet, summary, elapsed);

    Ok(outcome.count > 0)
}
