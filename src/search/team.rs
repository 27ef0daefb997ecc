//! # Teams
//!
//! A team is the group of workers that cooperates on one restart. Workers
//! run in lockstep: every phase of a pass ends at a shared barrier, and
//! team scratch written in one phase is only read in a later one.
//!
//! Team members must all be runnable at the same time, otherwise the
//! barrier never opens. Each team therefore runs on its own scoped OS
//! threads rather than on a work-stealing pool, which gives no such
//! guarantee.

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Barrier, Condvar, Mutex, PoisonError};
use std::thread;

use crate::city::Length;
use crate::error::{try_vec_with_capacity, ClimbError, Result};
use crate::tour::Tour;

/// Scratch shared by the workers of one restart.
#[derive(Debug)]
pub struct Team {
    size: usize,
    barrier: Barrier,
    /// Edge gain table, `gains[i] == -dist(i, i + 1)` once recomputed.
    pub(crate) gains: Box<[AtomicI64]>,
    /// One reduction lane per worker.
    lanes: Box<[AtomicI64]>,
    /// Worker whose local move is applied this pass.
    pub(crate) winner: AtomicUsize,
    /// First and last position of the segment to reverse.
    pub(crate) segment: [AtomicUsize; 2],
}

impl Team {
    /// Creates the scratch of a team of `size` workers for a tour of `cities` cities.
    ///
    /// # Errors
    ///
    /// Returns [`ClimbError::Configuration`] if `size` is zero, or
    /// [`ClimbError::AllocationFailure`] if the scratch cannot be reserved.
    pub fn new(cities: usize, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(ClimbError::Configuration(
                "Team size must be greater than 0".to_string(),
            ));
        }

        let mut gains = try_vec_with_capacity(cities, "edge gain table")?;
        gains.extend((0..cities).map(|_| AtomicI64::new(0)));
        let mut lanes = try_vec_with_capacity(size, "reduction lanes")?;
        lanes.extend((0..size).map(|_| AtomicI64::new(0)));

        Ok(Self {
            size,
            barrier: Barrier::new(size),
            gains: gains.into_boxed_slice(),
            lanes: lanes.into_boxed_slice(),
            winner: AtomicUsize::new(0),
            segment: [AtomicUsize::new(0), AtomicUsize::new(0)],
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Runs `job` on every worker of the team and returns the result of
    /// worker 0, which runs on the calling thread.
    ///
    /// Workers are held at a launch gate until the whole team has been
    /// spawned, so a failed spawn releases the others without letting any
    /// of them reach a barrier.
    ///
    /// # Errors
    ///
    /// Returns [`ClimbError::AllocationFailure`] if a worker thread cannot be spawned.
    pub fn run<F, R>(&self, tour: &Tour, job: F) -> Result<R>
    where
        F: Fn(&Worker<'_>) -> R + Sync,
    {
        let gate = LaunchGate::default();

        thread::scope(|scope| {
            for id in 1..self.size {
                let worker = Worker { id, team: self, tour };
                let (gate, job) = (&gate, &job);
                let spawned = thread::Builder::new()
                    .name(format!("twoopt-worker-{}", id))
                    .spawn_scoped(scope, move || {
                        if gate.wait() {
                            job(&worker);
                        }
                    });

                if let Err(e) = spawned {
                    gate.open(false);
                    return Err(ClimbError::AllocationFailure(format!(
                        "cannot spawn worker {} of {}: {}",
                        id, self.size, e
                    )));
                }
            }

            gate.open(true);
            Ok(job(&Worker {
                id: 0,
                team: self,
                tour,
            }))
        })
    }
}

/// Releases spawned workers once the whole team exists, or sends them home.
#[derive(Debug, Default)]
struct LaunchGate {
    state: Mutex<Option<bool>>,
    opened: Condvar,
}

impl LaunchGate {
    fn open(&self, go: bool) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = Some(go);
        self.opened.notify_all();
    }

    fn wait(&self) -> bool {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let state = self
            .opened
            .wait_while(state, |state| state.is_none())
            .unwrap_or_else(PoisonError::into_inner);
        state.unwrap_or(false)
    }
}

/// One member of a team, bound to the tour the team works on.
#[derive(Debug, Clone, Copy)]
pub struct Worker<'a> {
    id: usize,
    team: &'a Team,
    tour: &'a Tour,
}

impl<'a> Worker<'a> {
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn team(&self) -> &'a Team {
        self.team
    }

    pub fn tour(&self) -> &'a Tour {
        self.tour
    }

    /// Worker 0 performs the once-per-team side effects.
    pub fn is_leader(&self) -> bool {
        self.id == 0
    }

    /// Blocks until every worker of the team has arrived.
    pub fn wait(&self) {
        self.team.barrier.wait();
    }

    /// Positions `id, id + size, ...` below `end`.
    pub fn stride(&self, end: usize) -> impl Iterator<Item = usize> {
        (self.id..end).step_by(self.team.size)
    }

    /// Combines one value per worker with a pairwise tree reduction and
    /// returns the result to every worker.
    ///
    /// Each round the lower `size - ceil(size / 2)` lanes absorb the lanes
    /// `ceil(size / 2)` above them, so reads and writes of a round never
    /// overlap. A barrier closes every round. `combine` must be associative
    /// and commutative.
    ///
    /// Every worker must call this, and a barrier must separate the call
    /// from any later call.
    pub fn reduce(&self, value: Length, combine: impl Fn(Length, Length) -> Length) -> Length {
        let lanes = &self.team.lanes;
        lanes[self.id].store(value, Ordering::Relaxed);
        self.wait();

        let mut acc = value;
        let mut size = self.team.size;
        while size > 1 {
            let half = (size + 1) / 2;
            if self.id + half < size {
                acc = combine(acc, lanes[self.id + half].load(Ordering::Relaxed));
                lanes[self.id].store(acc, Ordering::Relaxed);
            }
            size = half;
            self.wait();
        }

        lanes[0].load(Ordering::Relaxed)
    }
}
