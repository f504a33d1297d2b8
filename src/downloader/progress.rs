//! Run-wide accounting shared by every fetch task.

use crate::types::{DownloadOutcome, ProgressSnapshot};
use std::sync::atomic::{AtomicU64, Ordering};

/// Progress accumulator for a download run
///
/// Owned by the caller and handed to the pipeline behind an `Arc`. All counters
/// are atomics, so fetch tasks update them concurrently without a lock.
#[derive(Debug, Default)]
pub struct Progress {
    total: AtomicU64,
    done: AtomicU64,
    failed: AtomicU64,
    bytes: AtomicU64,
    in_flight: AtomicU64,
    peak_in_flight: AtomicU64,
}

impl Progress {
    /// Empty accumulator
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `count` more files as part of the run
    pub(crate) fn add_total(&self, count: u64) {
        self.total.fetch_add(count, Ordering::SeqCst);
    }

    /// A fetch has been admitted through the gate
    pub(crate) fn fetch_started(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
    }

    /// A fetch has finished, successfully or not
    pub(crate) fn fetch_finished(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    /// Account for one outcome and return the state right after it
    pub(crate) fn record(&self, outcome: &DownloadOutcome) -> ProgressSnapshot {
        let (failed, bytes) = match &outcome.result {
            Ok(written) => (
                self.failed.load(Ordering::SeqCst),
                self.bytes.fetch_add(*written, Ordering::SeqCst) + written,
            ),
            Err(_) => (
                self.failed.fetch_add(1, Ordering::SeqCst) + 1,
                self.bytes.load(Ordering::SeqCst),
            ),
        };
        let done = self.done.fetch_add(1, Ordering::SeqCst) + 1;

        ProgressSnapshot {
            done,
            total: self.total.load(Ordering::SeqCst),
            failed,
            bytes,
        }
    }

    /// Current totals
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            done: self.done.load(Ordering::SeqCst),
            total: self.total.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
            bytes: self.bytes.load(Ordering::SeqCst),
        }
    }

    /// Fetches currently holding a gate slot
    pub fn in_flight(&self) -> u64 {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneous fetches seen so far
    pub fn peak_in_flight(&self) -> u64 {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}
