//! # SegmentKernel — Sieving a Single Chunk
//!
//! Everything here runs inside one worker, against one chunk's own bit
//! array. The kernel never touches another segment's memory; the only
//! shared state it reads is the immutable `is_prime` and `pre_sieve`
//! tables built once by the driver.

use crate::bitsieve::BitSieve;
use crate::error::{Result, SieveError};
use crate::wheel::{candidate, isqrt, skip_ahead, LuoState};

/// What a chunk's sieved bits get turned into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Count,
    Sum,
    Print,
}

/// `F_adj = F - (F mod 6) - 6 + 1` when `F > 5`, else `1`.
pub fn f_adj(f: u64) -> u64 {
    if f > 5 {
        f - (f % 6) - 6 + 1
    } else {
        1
    }
}

/// The aligned bounds and local index geometry of one chunk.
#[derive(Clone, Copy, Debug)]
pub struct SegmentParams {
    pub chunk_id: u64,
    pub low: u64,
    pub high: u64,
    pub m: u64,
    pub m2: u64,
    pub n_off: u64,
    pub j_off: u64,
}

impl SegmentParams {
    /// Builds the geometry for the chunk starting at `low`, clipped to
    /// `step_sz` wide and never exceeding `n`. Returns `None` once `low`
    /// has run past `n` or a 64-bit overflow would make `high < low`.
    pub fn new(chunk_id: u64, low: u64, step_sz: u64, n: u64) -> Option<Self> {
        if low > n {
            return None;
        }
        let high = low.saturating_add(step_sz - 1).min(n);
        if high < low {
            return None;
        }
        let x = high - low + (high & 1);
        let m = (x + 2) / 3;
        let m2 = high / 3;
        let n_off = low - 1;
        let j_off = n_off / 3;
        Some(SegmentParams {
            chunk_id,
            low,
            high,
            m,
            m2,
            n_off,
            j_off,
        })
    }
}

/// What a sieved chunk contributes to the driver's aggregate. `count` is
/// always the chunk's prime count, independent of `mode`; `sum` and
/// `print_buf` are populated only in the modes that need them.
pub struct SegmentOutcome {
    pub count: u64,
    pub sum: u128,
    pub print_buf: Option<Vec<u8>>,
}

/// The Luo-recurrence starting point for the segment's own sieve pass:
/// `N < 10^12` resumes at wheel index 6 (first sieve prime 19); `N >=
/// 10^12` resumes at wheel index 7 (first sieve prime 23), since the
/// pre-sieve template already removed multiples of the smaller primes.
fn resume_state(n: u64) -> (LuoState, u64) {
    if n < 1_000_000_000_000 {
        (LuoState { k: 2, c: 96, t: 34 }, 6)
    } else {
        (LuoState { k: 1, c: 120, t: 38 }, 7)
    }
}

/// Runs the full segment kernel: allocate, copy the template, apply the
/// boundary corrections, sieve, and emit.
pub fn run(
    params: &SegmentParams,
    is_prime: &BitSieve,
    pre_sieve: &BitSieve,
    f: u64,
    n: u64,
    f_adj_val: u64,
    mode: Mode,
) -> Result<SegmentOutcome> {
    let nbits = params.m + 2;
    let mut seg = BitSieve::new(nbits);
    seg.copy_from(pre_sieve);

    if params.low == 1 {
        seg.set_byte(0, 0xfe);
    }

    if params.low == f_adj_val && f > 5 {
        if params.n_off + candidate(1) < f {
            seg.clear(1);
        }
        if params.n_off + candidate(2) < f {
            seg.clear(2);
        }
    }

    if params.high == n {
        seg.clear_from(params.m + 2);
        if params.n_off + candidate(params.m) > n {
            seg.clear(params.m);
        }
        if params.n_off + candidate(params.m + 1) > n {
            seg.clear(params.m + 1);
        }
    }

    let (mut state, start_i) = resume_state(n);
    let q_local = isqrt(params.high) / 3;
    if start_i <= q_local {
        let mut i = start_i;
        while i <= q_local {
            let ij0 = state.advance(i);
            if i >= is_prime.nbits() {
                return Err(SieveError::InternalInvariantError(format!(
                    "q_local index {i} exceeds is_prime table length {}",
                    is_prime.nbits()
                )));
            }
            if is_prime.get(i) {
                let (mut j, mut ij) = skip_ahead(state.c, ij0, state.t, params.j_off);
                while j <= params.m2 {
                    let local = j - params.j_off;
                    if local < seg.nbits() {
                        seg.clear(local);
                    }
                    j += ij;
                    ij = state.t - ij;
                }
            }
            i += 1;
        }
    }

    emit(params, &seg, f, n, mode)
}

fn includes_small_prime(p: u64, f: u64, n: u64, low: u64, high: u64) -> bool {
    p >= f && p <= n && p >= low && p <= high
}

fn emit(params: &SegmentParams, seg: &BitSieve, f: u64, n: u64, mode: Mode) -> Result<SegmentOutcome> {
    let want_2 = includes_small_prime(2, f, n, params.low, params.high);
    let want_3 = includes_small_prime(3, f, n, params.low, params.high);

    // The chunk's prime count is computed in every mode, not just COUNT: it
    // is cheap (a single popcount) and lets the driver report "at least one
    // prime found" for the CLI's exit code regardless of SUM/PRINT mode.
    let mut count = seg.count_ones();
    if want_2 {
        count += 1;
    }
    if want_3 {
        count += 1;
    }

    match mode {
        Mode::Count => Ok(SegmentOutcome {
            count,
            sum: 0,
            print_buf: None,
        }),
        Mode::Sum => {
            let mut sum: u128 = 0;
            if want_2 {
                sum += 2;
            }
            if want_3 {
                sum += 3;
            }
            for i in seg.iter_ones() {
                sum += (params.n_off + candidate(i)) as u128;
            }
            Ok(SegmentOutcome {
                count,
                sum,
                print_buf: None,
            })
        }
        Mode::Print => {
            let mut buf = Vec::new();
            if want_2 {
                buf.extend_from_slice(b"2\n");
            }
            if want_3 {
                buf.extend_from_slice(b"3\n");
            }
            for i in seg.iter_ones() {
                let v = params.n_off + candidate(i);
                buf.extend_from_slice(v.to_string().as_bytes());
                buf.push(b'\n');
            }
            Ok(SegmentOutcome {
                count,
                sum: 0,
                print_buf: Some(buf),
            })
        }
    }
}
