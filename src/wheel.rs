//! # WheelIndex — Index Algebra for the Mod-6 Wheel
//!
//! Every candidate prime `p > 3` satisfies `p mod 6 ∈ {1, 5}`. A bit index
//! `i >= 1` represents a candidate as `p = 3i + 2` (`i` odd) or `p = 3i + 1`
//! (`i` even); index 0 is reserved (it would denote the integer 1). This
//! module also carries Luo's composite-enumeration recurrence (Algorithm 3,
//! ACM 32(3), 1989), which walks the composite indices of a wheel prime
//! without ever dividing.

/// The integer represented by wheel index `i` (no segment offset applied).
#[inline]
pub fn candidate(i: u64) -> u64 {
    if i % 2 == 1 {
        3 * i + 2
    } else {
        3 * i + 1
    }
}

/// The wheel index of an integer known to be coprime to 6 (`v > 3`).
#[inline]
pub fn index_of(v: u64) -> u64 {
    match v % 6 {
        5 => (v - 2) / 3,
        1 => (v - 1) / 3,
        _ => panic!("{v} is not coprime to 6"),
    }
}

/// Integer square root via Newton's method (no floating point, exact for
/// the full `u64` range).
pub fn isqrt(n: u64) -> u64 {
    if n == 0 {
        return 0;
    }
    let mut x0 = n >> 1;
    if x0 == 0 {
        return n;
    }
    let mut x1 = (x0 + n / x0) >> 1;
    while x1 < x0 {
        x0 = x1;
        x1 = (x0 + n / x0) >> 1;
    }
    x0
}

/// Luo's evolving `(k, c, t)` state. `advance(i)` steps the recurrence from
/// index `i-1` to `i` and returns the first composite-walk increment `ij`;
/// after the call, `self.c` holds the starting composite index for the
/// prime at wheel index `i` and `self.t` holds its cycle length (`ij + (t -
/// ij)`, the sum of the two alternating step sizes).
#[derive(Clone, Copy, Debug)]
pub struct LuoState {
    pub k: u64,
    pub c: u64,
    pub t: u64,
}

impl LuoState {
    /// The state before the first call to `advance(1)`.
    pub fn initial() -> Self {
        LuoState { k: 1, c: 0, t: 2 }
    }

    /// Advances the recurrence to wheel index `i`, returning the first
    /// composite-walk increment for the prime at that index.
    #[inline]
    pub fn advance(&mut self, i: u64) -> u64 {
        self.k = 3 - self.k;
        self.c += 4 * self.k * i;
        self.t += 4 * self.k;
        2 * i * (3 - self.k) + 1
    }
}

/// Fast-forwards a composite walk `(j, ij)` — starting at `c` with first
/// increment `ij0` and cycle length `t` — to the first `j >= j_off`.
///
/// Each pair of steps advances `j` by exactly `t` (`ij + (t - ij) == t`), so
/// whole cycles are skipped in one division; at most one extra single step
/// is then needed to cross the remaining gap.
pub fn skip_ahead(c: u64, ij0: u64, t: u64, j_off: u64) -> (u64, u64) {
    if c >= j_off {
        return (c, ij0);
    }
    let delta = (j_off - c) / t;
    let mut j = c + delta * t + ij0;
    let mut ij = t - ij0;
    if j < j_off {
        j += ij;
        ij = t - ij;
    }
    (j, ij)
}
