//! # Move selection
//!
//! One pass of 2-opt local search, executed cooperatively by every worker
//! of a team:
//!
//! 1. recompute the edge gain table, each worker taking a strided share;
//! 2. each worker scans its strided share of rows `i` against all
//!    `j >= i + 2`, tile by tile, keeping its best candidate;
//! 3. a tree reduction finds the team-wide smallest change;
//! 4. a worker holding that change publishes its segment;
//! 5. if the change is negative the team reverses the segment.
//!
//! Phases are separated by barriers. When several workers hold the same
//! smallest change, whichever claims the winner slot last is applied. Tied
//! moves improve the tour by the same amount.

use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::Ordering;

use crate::city::{dist_xy, Length};
use crate::tour::Tour;

use super::team::Worker;
use super::tile::{Row, Tile};

/// A 2-opt exchange: reversing tour positions `first..=last` replaces edges
/// `(first - 1, first)` and `(last, last + 1)` with `(first - 1, last)` and
/// `(first, last + 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TwoOptMove {
    pub first: usize,
    pub last: usize,
    /// Change in tour length; always negative for an applied move.
    pub change: Length,
}

impl TwoOptMove {
    /// Amount by which the move shortens the tour.
    pub fn gain(&self) -> Length {
        -self.change
    }
}

/// Change in tour length caused by replacing edges `(i, i + 1)` and
/// `(j, j + 1)` with `(i, j)` and `(i + 1, j + 1)`.
pub fn move_change(tour: &Tour, i: usize, j: usize) -> Length {
    let d = |a: usize, b: usize| dist_xy(tour.x(a), tour.y(a), tour.x(b), tour.y(b));
    d(i, j) + d(i + 1, j + 1) - tour.edge(i) - tour.edge(j)
}

/// Best move seen by one worker.
///
/// Among equal changes the one met first in row-major scan order (rows
/// ascending, partners descending) is kept, so the result does not depend on
/// how the scan is tiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Candidate {
    pub(crate) change: Length,
    pub(crate) i: usize,
    pub(crate) j: usize,
}

impl Candidate {
    /// No improving move.
    pub(crate) const NONE: Candidate = Candidate {
        change: 0,
        i: 0,
        j: 0,
    };

    #[inline(always)]
    pub(crate) fn offer(&mut self, change: Length, i: usize, j: usize) {
        if change < self.change
            || (change == self.change && change < 0 && self.comes_after(i, j))
        {
            *self = Candidate { change, i, j };
        }
    }

    fn comes_after(&self, i: usize, j: usize) -> bool {
        match i.cmp(&self.i) {
            CmpOrdering::Less => true,
            CmpOrdering::Equal => j > self.j,
            CmpOrdering::Greater => false,
        }
    }
}

/// Scans this worker's rows and returns its best candidate.
///
/// Rows are `id, id + size, ...` below `len - 2`. Partners are swept from
/// `len - 1` downwards one tile at a time, and every tile is offered to all
/// rows it can pair with before the next one is loaded.
pub(crate) fn scan<const N: usize>(worker: &Worker<'_>) -> Candidate {
    let tour = worker.tour();
    let gains = &worker.team().gains;
    let len = tour.len();
    let mut best = Candidate::NONE;

    let rows = len.saturating_sub(2);
    if worker.id() >= rows {
        return best;
    }
    let lowest_partner = worker.id() + 2;

    let mut tile = Tile::<N>::new();
    let mut upper = len - 1;
    loop {
        let lower = (upper + 1).saturating_sub(N).max(lowest_partner);
        tile.load(tour, gains, lower, upper);

        for i in worker.stride(rows) {
            if i + 2 > upper {
                break;
            }
            tile.sweep(&Row::at(tour, gains, i), &mut best);
        }

        if lower == lowest_partner {
            break;
        }
        upper = lower - 1;
    }

    best
}

/// Runs one pass on the calling worker. Every worker of the team must call
/// this together; all of them return the same result.
///
/// Returns the applied move, or `None` if the tour is already 2-opt optimal.
pub fn pass<const N: usize>(worker: &Worker<'_>) -> Option<TwoOptMove> {
    let tour = worker.tour();
    let team = worker.team();
    let len = tour.len();

    for pos in worker.stride(len) {
        team.gains[pos].store(-tour.edge(pos), Ordering::Relaxed);
    }
    worker.wait();

    let local = scan::<N>(worker);

    let best_change = worker.reduce(local.change, Length::min);
    if local.change == best_change {
        team.winner.store(worker.id(), Ordering::Relaxed);
    }
    worker.wait();

    if team.winner.load(Ordering::Relaxed) == worker.id() {
        team.segment[0].store(local.i + 1, Ordering::Relaxed);
        team.segment[1].store(local.j, Ordering::Relaxed);
    }
    worker.wait();

    let applied = (best_change < 0).then(|| TwoOptMove {
        first: team.segment[0].load(Ordering::Relaxed),
        last: team.segment[1].load(Ordering::Relaxed),
        change: best_change,
    });

    if let Some(m) = applied {
        let pairs = (m.last - m.first + 1) / 2;
        for k in worker.stride(pairs) {
            tour.swap(m.first + k, m.last - k);
        }
    }
    worker.wait();

    applied
}
