//! # SmallPrimes — The `is_prime` Seed Table
//!
//! A plain (unsegmented) wheel sieve of length `q = ⌊√N / 3⌋`, built once on
//! the main thread before any segment work starts. Every segment's own
//! sieving kernel walks this table to decide which wheel primes to sieve
//! out of its own bit array, so it must be complete and correct before the
//! first chunk is dispatched.

use crate::bitsieve::BitSieve;
use crate::wheel::{isqrt, LuoState};

/// Builds `is_prime[i]` for `i` in `[0, q]`, where `q = isqrt(n) / 3`.
///
/// Bit 0 is cleared unconditionally: wheel index 0 denotes the integer 1,
/// which is not prime. Every other bit `i` ends up set iff the integer at
/// wheel index `i` is prime.
pub fn build(n: u64) -> BitSieve {
    let q = isqrt(n) / 3;
    let mut is_prime = BitSieve::new(q + 2);
    is_prime.clear(0);

    let mut state = LuoState::initial();
    let mut i = 1u64;
    while i <= q {
        let ij0 = state.advance(i);
        if is_prime.get(i) {
            let mut j = state.c;
            let mut ij = ij0;
            while j <= q {
                is_prime.clear(j);
                j += ij;
                ij = state.t - ij;
            }
        }
        i += 1;
    }
    is_prime
}
