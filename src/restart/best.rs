//! # Global Best
//!
//! The only state shared between restarts: the shortest tour length seen so
//! far and the number of passes run. Both are single-word associative
//! reductions, so plain atomic read-modify-write is enough.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use crate::city::Length;

/// Best tour length and climb count across restarts.
#[derive(Debug)]
pub struct GlobalBest {
    length: AtomicI64,
    climbs: AtomicU64,
}

impl GlobalBest {
    /// Starts with no length recorded (the maximum representable value) and
    /// zero climbs.
    pub fn new() -> Self {
        Self {
            length: AtomicI64::new(Length::MAX),
            climbs: AtomicU64::new(0),
        }
    }

    /// Keeps the smaller of the recorded length and `length`.
    ///
    /// Returns `true` if `length` became the new best.
    pub fn merge(&self, length: Length) -> bool {
        self.length.fetch_min(length, Ordering::AcqRel) > length
    }

    /// Counts one completed pass.
    pub fn record_climb(&self) {
        self.climbs.fetch_add(1, Ordering::Relaxed);
    }

    /// Shortest length merged so far, or `None` if no restart has finished.
    pub fn best_length(&self) -> Option<Length> {
        let length = self.length.load(Ordering::Acquire);
        (length != Length::MAX).then_some(length)
    }

    pub fn climbs(&self) -> u64 {
        self.climbs.load(Ordering::Relaxed)
    }
}

impl Default for GlobalBest {
    fn default() -> Self {
        Self::new()
    }
}
