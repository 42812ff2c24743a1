//! # Output — Ordered Emission and Reduction
//!
//! COUNT and SUM results only need atomic reduction (segment order is
//! irrelevant to either). PRINT results must reach the sink in ascending
//! segment order even though segments finish sieving out of order, so this
//! module buffers each chunk's formatted text until every earlier chunk
//! has flushed, per §5's "per-chunk slot plus a monotonically advancing
//! next-to-flush cursor" contract — the only state guarded by a lock is
//! that slot map and cursor, never the sieving itself.

use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Condvar, Mutex};

use crate::error::{Result, SieveError};

/// Lock-free reduction target for COUNT and SUM modes.
#[derive(Default)]
pub struct Accumulator {
    count: AtomicU64,
    sum_hi: AtomicU64,
    sum_lo: AtomicU64,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_count(&self, n: u64) {
        self.count.fetch_add(n, Ordering::Relaxed);
    }

    /// Adds a `u128` contribution, split across two atomics (there is no
    /// stable `AtomicU128`): the high half is only ever touched while
    /// folding in the rare carry from the low half.
    pub fn add_sum(&self, n: u128) {
        let lo = (n & u64::MAX as u128) as u64;
        let hi = (n >> 64) as u64;
        let prev_lo = self.sum_lo.fetch_add(lo, Ordering::Relaxed);
        let carry = prev_lo.checked_add(lo).is_none() as u64;
        self.sum_hi.fetch_add(hi + carry, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn sum(&self) -> u128 {
        ((self.sum_hi.load(Ordering::Relaxed) as u128) << 64)
            | self.sum_lo.load(Ordering::Relaxed) as u128
    }
}

/// Caps how many finished-but-not-yet-flushable chunk buffers can queue up
/// before a producer blocks, bounding memory when one slow worker stalls
/// far behind the others.
const PENDING_CAP: usize = 64;

struct OrderedState {
    next_to_flush: u64,
    pending: HashMap<u64, Vec<u8>>,
    cancelled: bool,
}

/// The ordered print sink: one instance shared by every worker for the
/// lifetime of a PRINT-mode run.
pub struct OrderedSink<W: Write> {
    writer: Mutex<W>,
    state: Mutex<OrderedState>,
    not_full: Condvar,
    flushed: Condvar,
}

impl<W: Write> OrderedSink<W> {
    pub fn new(writer: W) -> Self {
        OrderedSink {
            writer: Mutex::new(writer),
            state: Mutex::new(OrderedState {
                next_to_flush: 0,
                pending: HashMap::new(),
                cancelled: false,
            }),
            not_full: Condvar::new(),
            flushed: Condvar::new(),
        }
    }

    /// Submits chunk `chunk_id`'s formatted output, writing through
    /// immediately (and any now-contiguous successors already queued) if
    /// it is next in line, otherwise buffering it until its turn comes.
    ///
    /// Returns an `IOError` if the underlying writer fails, at which point
    /// the sink is marked cancelled and further submissions are dropped.
    pub fn submit(&self, chunk_id: u64, buf: Vec<u8>) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        while state.pending.len() >= PENDING_CAP && chunk_id != state.next_to_flush {
            state = self.not_full.wait(state).unwrap();
        }
        if state.cancelled {
            return Ok(());
        }
        state.pending.insert(chunk_id, buf);

        if chunk_id != state.next_to_flush {
            return Ok(());
        }

        let write_result = self.flush_contiguous(&mut state);
        self.not_full.notify_all();
        self.flushed.notify_all();
        write_result
    }

    fn flush_contiguous(&self, state: &mut OrderedState) -> Result<()> {
        let mut writer = self.writer.lock().unwrap();
        while let Some(buf) = state.pending.remove(&state.next_to_flush) {
            if let Err(e) = writer.write_all(&buf) {
                state.cancelled = true;
                return Err(SieveError::IOError(e));
            }
            state.next_to_flush += 1;
        }
        Ok(())
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.lock().unwrap().cancelled
    }

    pub fn cancel(&self) {
        let mut state = self.state.lock().unwrap();
        state.cancelled = true;
        self.not_full.notify_all();
    }

    pub fn into_inner(self) -> io::Result<W> {
        self.writer.into_inner().map_err(|_| {
            io::Error::new(io::ErrorKind::Other, "output sink mutex poisoned")
        })
    }
}

/// Wraps stdout in a buffered writer with a generous flush threshold, as
/// the teacher's CLI paths do for high-volume textual output.
pub fn buffered_stdout() -> io::BufWriter<io::Stdout> {
    io::BufWriter::with_capacity(64 * 1024, io::stdout())
}
