//! # PreSieveTemplate — The Reusable Segment Seed
//!
//! A single bit template of `sieve_sz = step_sz / 3` indices, pre-cleared
//! of every multiple of the smallest wheel primes (`{5, 7, 11, 13, 17}`, or
//! with `19` folded in once `N >= 10^12`). Every segment starts life as a
//! byte-for-byte copy of this template instead of re-sieving those primes
//! from scratch, which is why it dominates so much of the kernel's overall
//! throughput despite running only once.

use crate::bitsieve::BitSieve;
use crate::wheel::{skip_ahead, LuoState};

/// Sieve-primes folded into the template correspond to wheel indices
/// `1..=5` below `10^12`, `1..=6` at or above it (i.e. `{5,7,11,13,17}` or
/// `{5,7,11,13,17,19}`).
pub fn last_sieve_prime_index(n: u64) -> u64 {
    if n < 1_000_000_000_000 {
        5
    } else {
        6
    }
}

/// Builds the pre-sieve template for a step size `step_sz` (so
/// `sieve_sz = step_sz / 3` bits), seeded so that copying it into a segment
/// whose integer offset is `f_adj - 1` already has every multiple of the
/// folded-in sieve-primes cleared from index `j_off` onward.
pub fn build(step_sz: u64, n: u64, f_adj: u64) -> BitSieve {
    let sieve_sz = step_sz / 3;
    let mut template = BitSieve::new(sieve_sz + 2);

    let j_off = (f_adj - 1) / 3;
    let last_index = last_sieve_prime_index(n);

    let mut state = LuoState::initial();
    for i in 1..=last_index {
        let ij0 = state.advance(i);
        let (mut j, mut ij) = skip_ahead(state.c, ij0, state.t, j_off);
        while j <= j_off + sieve_sz {
            template.clear(j - j_off);
            j += ij;
            ij = state.t - ij;
        }
    }

    if f_adj == 1 {
        let finalize_byte = if n < 1_000_000_000_000 { 0xc0 } else { 0x80 };
        template.set_byte(0, finalize_byte);
    }

    template.clear_from(sieve_sz);
    template
}
