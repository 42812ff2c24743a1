//! Error taxonomy for the sieve core and its CLI shell.
//!
//! Mirrors the four kinds of failure the driver can report: bad input
//! bounds, a failed allocation, a failed write to the output sink, and a
//! broken internal invariant (a programming error, not a user error).
//! `main` maps each kind to a distinct process exit code.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SieveError {
    /// Unparseable or out-of-range bounds, invalid ordering, sum limit exceeded.
    #[error("invalid input: {0}")]
    InputError(String),

    /// Allocation failure for `is_prime`, `pre_sieve`, or a segment bit array.
    #[error("allocation of {requested_bits} bits for {target} failed")]
    ResourceError {
        target: &'static str,
        requested_bits: u64,
    },

    /// A write to the output sink failed.
    #[error("output error: {0}")]
    IOError(#[from] std::io::Error),

    /// A broken invariant: step size not a wheel multiple, segment indices
    /// out of range, or a 64-bit sum overflowed its documented limit.
    #[error("internal invariant violated: {0}")]
    InternalInvariantError(String),
}

pub type Result<T> = std::result::Result<T, SieveError>;

/// Exit codes per the CLI contract: 0 primes found, 1 none found, >1 error.
pub fn exit_code_for(err: &SieveError) -> i32 {
    match err {
        SieveError::InputError(_) => 2,
        SieveError::InternalInvariantError(_) => 2,
        SieveError::ResourceError { .. } => 3,
        SieveError::IOError(_) => 4,
    }
}
