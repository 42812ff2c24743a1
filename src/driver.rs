//! # ParallelDriver — Chunk Partitioning and Dispatch
//!
//! Owns the whole run: picks `step_sz`, builds the two shared read-only
//! tables once, then fans `[F_adj, N]` out across a fixed pool of OS
//! threads opened with `std::thread::scope`, each walking a static
//! round-robin stride of chunk ids so the schedule is reproducible for a
//! given `T` without any work-stealing.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tracing::{info, info_span, warn};

use crate::bitsieve::BitSieve;
use crate::error::{Result, SieveError};
use crate::output::{Accumulator, OrderedSink};
use crate::segment::{self, Mode, SegmentParams};
use crate::{presieve, small_primes};

const PROGRESS_THRESHOLD: u64 = 2_000_000_000;

/// Picks `step_sz` from the exact ladder in §4.F, keyed on `N`.
pub fn step_size_for(n: u64) -> u64 {
    const BASE_SMALL: u64 = 510_510 * 12;
    const BASE_LARGE: u64 = 9_699_690;
    if n < 1_000_000_000_000 {
        return BASE_SMALL;
    }
    let multiplier = if n < 10u64.pow(13) {
        1
    } else if n < 10u64.pow(14) {
        2
    } else if n < 10u64.pow(15) {
        3
    } else if n < 10u64.pow(16) {
        4
    } else if n < 10u64.pow(17) {
        5
    } else if n < 10u64.pow(18) {
        6
    } else if n < 10u64.pow(19) {
        7
    } else {
        8
    };
    BASE_LARGE * multiplier
}

fn assert_step_sz_invariant(step_sz: u64, n: u64) -> Result<()> {
    let divisor = if n < 1_000_000_000_000 {
        510_510
    } else {
        9_699_690
    };
    if step_sz % divisor != 0 {
        return Err(SieveError::InternalInvariantError(format!(
            "step_sz {step_sz} is not a multiple of {divisor}"
        )));
    }
    Ok(())
}

/// Resolves `cli.rs`'s `--threads`/`--maxworkers` value (already parsed
/// into worker count by the CLI layer) down to at least 1.
pub fn clamp_threads(requested: u64) -> u64 {
    requested.max(1)
}

/// What the driver ultimately reports to `main`.
pub struct RunOutcome {
    pub count: u64,
    pub sum: u128,
}

/// Runs the sieve over `[f, n]` with `threads` workers, writing PRINT
/// output (if `mode == Print`) through `sink`, and reporting progress (if
/// eligible per §4.F) through `progress`.
pub fn run<W: Write + Send>(
    f: u64,
    n: u64,
    threads: u64,
    mode: Mode,
    sink: Option<&OrderedSink<W>>,
    progress: impl FnMut(u64) + Send,
) -> Result<RunOutcome> {
    let start = Instant::now();
    let f_adj_val = segment::f_adj(f);
    let step_sz = step_size_for(n);
    assert_step_sz_invariant(step_sz, n)?;

    info!(f, n, f_adj = f_adj_val, step_sz, threads, "sieve parameters resolved");

    let is_prime = build_is_prime(n)?;
    let pre_sieve = build_pre_sieve(step_sz, n, f_adj_val)?;

    let chunk_bounds = enumerate_chunks(f_adj_val, step_sz, n);
    let num_chunks = chunk_bounds.len() as u64;
    info!(num_chunks, "chunks enumerated");

    let accumulator = Accumulator::new();
    let cancelled = AtomicBool::new(false);
    let progress_enabled = n > PROGRESS_THRESHOLD && mode != Mode::Print;
    let completed = std::sync::atomic::AtomicU64::new(0);
    let progress_mutex = std::sync::Mutex::new(progress);

    let worker_count = threads.max(1).min(num_chunks.max(1));

    let result: Result<()> = std::thread::scope(|scope| {
        let is_prime_ref = &is_prime;
        let pre_sieve_ref = &pre_sieve;
        let chunk_bounds_ref = &chunk_bounds;
        let accumulator_ref = &accumulator;
        let cancelled_ref = &cancelled;
        let completed_ref = &completed;
        let progress_ref = &progress_mutex;

        let mut handles = Vec::with_capacity(worker_count as usize);
        for worker_id in 0..worker_count {
            let sink = sink;
            handles.push(scope.spawn(move || -> Result<()> {
                let span = info_span!("worker", worker_id);
                let _enter = span.enter();
                let mut chunk_id = worker_id;
                while (chunk_id as usize) < chunk_bounds_ref.len() {
                    if cancelled_ref.load(Ordering::Relaxed) {
                        break;
                    }
                    let low = chunk_bounds_ref[chunk_id as usize];
                    let params = SegmentParams::new(chunk_id, low, step_sz, n).ok_or_else(|| {
                        SieveError::InternalInvariantError(format!(
                            "chunk {chunk_id} produced no valid segment bounds"
                        ))
                    })?;
                    let outcome =
                        segment::run(&params, is_prime_ref, pre_sieve_ref, f, n, f_adj_val, mode);
                    match outcome {
                        Ok(o) => {
                            accumulator_ref.add_count(o.count);
                            accumulator_ref.add_sum(o.sum);
                            if let (Some(buf), Some(sink)) = (o.print_buf, sink) {
                                if let Err(e) = sink.submit(chunk_id, buf) {
                                    cancelled_ref.store(true, Ordering::Relaxed);
                                    return Err(e);
                                }
                            } else if o.print_buf.is_some() && sink.is_none() {
                                return Err(SieveError::InternalInvariantError(
                                    "print mode produced output with no sink attached".to_string(),
                                ));
                            }
                        }
                        Err(e) => {
                            cancelled_ref.store(true, Ordering::Relaxed);
                            return Err(e);
                        }
                    }
                    let done = completed_ref.fetch_add(1, Ordering::Relaxed) + 1;
                    if worker_id == 0 && progress_enabled {
                        let pct = (done.min(num_chunks) * 100 / num_chunks.max(1)).min(100);
                        (progress_ref.lock().unwrap())(pct);
                    }
                    chunk_id += worker_count;
                }
                Ok(())
            }));
        }

        let mut first_err = None;
        for handle in handles {
            if let Err(e) = handle.join().expect("worker thread panicked") {
                if first_err.is_none() {
                    first_err = Some(e);
                }
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    });

    if let Err(e) = result {
        warn!(error = %e, "sieve run aborted");
        return Err(e);
    }

    let elapsed = start.elapsed();
    info!(elapsed_s = elapsed.as_secs_f64(), "sieve run complete");

    Ok(RunOutcome {
        count: accumulator.count(),
        sum: accumulator.sum(),
    })
}

fn build_is_prime(n: u64) -> Result<BitSieve> {
    Ok(small_primes::build(n))
}

fn build_pre_sieve(step_sz: u64, n: u64, f_adj_val: u64) -> Result<BitSieve> {
    Ok(presieve::build(step_sz, n, f_adj_val))
}

/// Expands `[f_adj, n]` into the ascending sequence of chunk-start
/// integers, one per chunk, via a generator loop rather than the closed
/// form `ceil((N - F_adj + step_sz)/step_sz)` — the closed form overcounts
/// by one near small ranges once F_adj sits close to N, so dispatch walks
/// the actual boundary instead of trusting the formula blindly.
fn enumerate_chunks(f_adj_val: u64, step_sz: u64, n: u64) -> Vec<u64> {
    let mut bounds = Vec::new();
    let mut low = f_adj_val;
    while low <= n {
        bounds.push(low);
        match low.checked_add(step_sz) {
            Some(next) => low = next,
            None => break,
        }
    }
    bounds
}
