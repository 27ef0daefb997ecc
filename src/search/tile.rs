//! # Tiles
//!
//! A tile is a fixed-capacity, stack-resident copy of a contiguous block of
//! tour positions: their coordinates and their edge gains. A worker loads
//! one tile and sweeps it against every row (candidate `i` position) it
//! owns, so each block of the tour is read from shared memory once per
//! worker instead of once per row.
//!
//! The capacity is a const generic parameter. It only affects speed; the
//! move a sweep selects is the same for every capacity.

use std::sync::atomic::{AtomicI64, Ordering};

use crate::city::{dist_xy, Length};
use crate::tour::Tour;

use super::selector::Candidate;

/// Default number of tour positions held by one tile.
pub const TILE_SIZE: usize = 128;

/// The fixed endpoint of a sweep: edge `(i, i + 1)` of the tour.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Row {
    i: usize,
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    gain: Length,
}

impl Row {
    pub(crate) fn at(tour: &Tour, gains: &[AtomicI64], i: usize) -> Self {
        Self {
            i,
            x0: tour.x(i),
            y0: tour.y(i),
            x1: tour.x(i + 1),
            y1: tour.y(i + 1),
            gain: gains[i].load(Ordering::Relaxed),
        }
    }
}

/// Coordinates and gains of tour positions `lower..=upper`, plus the
/// coordinates of position `upper + 1`.
#[derive(Debug, Clone)]
pub(crate) struct Tile<const N: usize> {
    lower: usize,
    len: usize,
    x: [f32; N],
    y: [f32; N],
    gain: [Length; N],
    next_x: f32,
    next_y: f32,
}

impl<const N: usize> Tile<N> {
    pub(crate) fn new() -> Self {
        assert!(N > 0, "tile capacity must be positive");
        Self {
            lower: 0,
            len: 0,
            x: [0.0; N],
            y: [0.0; N],
            gain: [0; N],
            next_x: 0.0,
            next_y: 0.0,
        }
    }

    /// Stages positions `lower..=upper`.
    ///
    /// `upper + 1` must be a valid tour position (the sentinel counts) and the
    /// block must fit the capacity.
    pub(crate) fn load(&mut self, tour: &Tour, gains: &[AtomicI64], lower: usize, upper: usize) {
        debug_assert!(lower <= upper && upper - lower < N);
        self.lower = lower;
        self.len = upper - lower + 1;
        for k in 0..self.len {
            let pos = lower + k;
            self.x[k] = tour.x(pos);
            self.y[k] = tour.y(pos);
            self.gain[k] = gains[pos].load(Ordering::Relaxed);
        }
        self.next_x = tour.x(upper + 1);
        self.next_y = tour.y(upper + 1);
    }

    /// Highest tour position held.
    pub(crate) fn upper(&self) -> usize {
        self.lower + self.len - 1
    }

    /// Evaluates every move pairing `row` with a staged position `j >= i + 2`,
    /// walking `j` downwards, and folds them into `best`.
    #[inline]
    pub(crate) fn sweep(&self, row: &Row, best: &mut Candidate) {
        let first_j = self.lower.max(row.i + 2);
        if first_j > self.upper() {
            return;
        }

        let (mut xj1, mut yj1) = (self.next_x, self.next_y);
        for k in (first_j - self.lower..self.len).rev() {
            let (xj0, yj0) = (self.x[k], self.y[k]);
            let change = self.gain[k]
                + row.gain
                + dist_xy(row.x0, row.y0, xj0, yj0)
                + dist_xy(row.x1, row.y1, xj1, yj1);
            xj1 = xj0;
            yj1 = yj0;
            best.offer(change, row.i, self.lower + k);
        }
    }
}
