//! # Restart Climber
//!
//! A climber owns everything one restart needs: its private tour and the
//! scratch of its worker team. It moves through four states:
//!
//! - **init**: copy the shared coordinates into the private tour;
//! - **shuffle**: permute the tour with the restart's seed;
//! - **local search**: run passes until one finds no improving move;
//! - **converged**: reduce the tour length across the team and merge it
//!   into the global best.
//!
//! Nothing a climber owns is visible to any other restart.

use tracing::{debug, trace};

use crate::city::{Cities, Length};
use crate::error::Result;
use crate::restart::{GlobalBest, LogLevel};
use crate::tour::Tour;

use super::selector::{pass, TwoOptMove};
use super::team::Team;
use super::tile::TILE_SIZE;

/// Result of one restart run to convergence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RestartOutcome {
    /// Restart identifier.
    pub restart: usize,
    /// Length of the locally optimal tour.
    pub length: Length,
    /// Passes run, including the final non-improving one.
    pub climbs: u64,
}

/// One restart of the random-restart hill climber.
#[derive(Debug)]
pub struct Climber {
    restart: usize,
    tour: Tour,
    team: Team,
    log_level: LogLevel,
}

impl Climber {
    /// Prepares restart `restart`: copies `cities` into a private tour,
    /// shuffles it with `seed` and allocates the scratch of a team of
    /// `team_size` workers.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ClimbError::Configuration`] if `team_size` is zero, or
    /// [`crate::ClimbError::AllocationFailure`] if any buffer cannot be reserved.
    pub fn new(cities: &Cities, restart: usize, seed: u32, team_size: usize) -> Result<Self> {
        let team = Team::new(cities.len(), team_size)?;
        let tour = Tour::shuffled(cities, seed)?;
        Ok(Self {
            restart,
            tour,
            team,
            log_level: LogLevel::None,
        })
    }

    /// Wraps an existing tour, skipping the shuffle.
    pub fn from_tour(tour: Tour, restart: usize, team_size: usize) -> Result<Self> {
        let team = Team::new(tour.len(), team_size)?;
        Ok(Self {
            restart,
            tour,
            team,
            log_level: LogLevel::None,
        })
    }

    /// Sets how much the climber reports through `tracing`.
    pub fn with_log_level(mut self, log_level: LogLevel) -> Self {
        self.log_level = log_level;
        self
    }

    pub fn restart(&self) -> usize {
        self.restart
    }

    pub fn tour(&self) -> &Tour {
        &self.tour
    }

    pub fn team_size(&self) -> usize {
        self.team.size()
    }

    /// Runs a single pass with the whole team and returns the applied move,
    /// if any.
    ///
    /// This is the same pass [`Climber::climb`] repeats; it is exposed for
    /// inspecting the search one step at a time.
    pub fn pass(&self) -> Result<Option<TwoOptMove>> {
        self.team.run(&self.tour, |worker| pass::<TILE_SIZE>(worker))
    }

    /// Runs passes until the tour is 2-opt optimal, then merges its length
    /// into `best`.
    ///
    /// Every pass is counted in `best` exactly once, by the team leader.
    pub fn climb(&self, best: &GlobalBest) -> Result<RestartOutcome> {
        let verbose = matches!(self.log_level, LogLevel::Verbose);

        let (length, climbs) = self.team.run(&self.tour, |worker| {
            let mut climbs = 0u64;
            loop {
                let applied = pass::<TILE_SIZE>(worker);
                climbs += 1;
                if worker.is_leader() {
                    best.record_climb();
                    if verbose {
                        trace!(
                            restart = self.restart,
                            climb = climbs,
                            ?applied,
                            "pass finished"
                        );
                    }
                }
                if applied.is_none() {
                    break;
                }
            }

            let partial: Length = worker
                .stride(self.tour.len())
                .map(|pos| self.tour.edge(pos))
                .sum();
            let length = worker.reduce(partial, |a, b| a + b);
            if worker.is_leader() {
                best.merge(length);
            }
            (length, climbs)
        })?;

        if !matches!(self.log_level, LogLevel::None) {
            debug!(restart = self.restart, length, climbs, "restart converged");
        }

        Ok(RestartOutcome {
            restart: self.restart,
            length,
            climbs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClimbError;

    #[test]
    fn test_rejects_empty_team() {
        let cities = Cities::grid(10).unwrap();
        let result = Climber::new(&cities, 0, 0, 0);
        assert!(matches!(result, Err(ClimbError::Configuration(_))));
    }

    #[test]
    fn test_climb_reports_to_global_best() {
        let cities = Cities::grid(10).unwrap();
        let best = GlobalBest::new();

        let climber = Climber::new(&cities, 3, 3, 4).unwrap();
        let start = climber.tour().length();
        let outcome = climber.climb(&best).unwrap();

        assert_eq!(outcome.restart, 3);
        assert!(outcome.length < start);
        assert_eq!(outcome.length, climber.tour().length());
        assert!(outcome.climbs >= 2);
        assert_eq!(best.best_length(), Some(outcome.length));
        assert_eq!(best.climbs(), outcome.climbs);
        assert!(climber.tour().is_permutation());
    }

    #[test]
    fn test_converged_tour_has_no_improving_move() {
        let cities = Cities::grid(10).unwrap();
        let climber = Climber::new(&cities, 0, 11, 3).unwrap();
        climber.climb(&GlobalBest::new()).unwrap();

        let tour = climber.tour();
        for i in 0..tour.len() - 2 {
            for j in i + 2..tour.len() {
                assert!(crate::search::move_change(tour, i, j) >= 0);
            }
        }
    }
}
