use rayon::prelude::*;
use tracing::info;

use super::{
    best::GlobalBest,
    options::{ClimbOptions, LogLevel},
};
use crate::{
    city::{Cities, Length},
    error::{ClimbError, OptionExt, Result, ResultExt},
    search::Climber,
};

/// Smallest instance the coordinator accepts.
pub const MIN_CITIES: usize = 100;

/// Outcome of a random-restart run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClimbReport {
    /// Shortest tour length found by any restart.
    pub best_length: Length,
    /// Passes run across all restarts.
    pub total_climbs: u64,
    /// Restarts run.
    pub restarts: usize,
    /// Size of the instance.
    pub cities: usize,
}

impl ClimbReport {
    /// Candidate 2-opt moves evaluated: every pass looks at
    /// `(cities - 2) * (cities - 1) / 2` edge pairs.
    pub fn evaluated_moves(&self) -> u128 {
        let n = self.cities as u128;
        self.total_climbs as u128 * n.saturating_sub(2) * n.saturating_sub(1) / 2
    }
}

/// Runs independent restarts concurrently and keeps the best result.
///
/// Each restart gets its own team of workers. Teams are scheduled on a rayon
/// pool whose size bounds how many restarts run at once; the rest queue.
#[derive(Debug, Clone, Default)]
pub struct RestartCoordinator {
    options: ClimbOptions,
}

impl RestartCoordinator {
    pub fn new(options: ClimbOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ClimbOptions {
        &self.options
    }

    /// Runs `restarts` restarts on `cities` and reports the shortest tour
    /// length and the total number of passes.
    ///
    /// # Errors
    ///
    /// This method will return an error if:
    /// - there are fewer than [`MIN_CITIES`] cities or `restarts` is zero
    ///   ([`ClimbError::InvalidInput`], before any restart starts)
    /// - the team size or concurrency is zero ([`ClimbError::Configuration`])
    /// - the team pool, a worker thread or a scratch buffer cannot be
    ///   obtained ([`ClimbError::AllocationFailure`]); no partial result is
    ///   reported
    pub fn solve(&self, cities: &Cities, restarts: usize) -> Result<ClimbReport> {
        if restarts < 1 {
            return Err(ClimbError::InvalidInput(format!(
                "restart count is too small: {}",
                restarts
            )));
        }

        if cities.len() < MIN_CITIES {
            return Err(ClimbError::InvalidInput(format!(
                "the problem size must be at least {} cities, got {}",
                MIN_CITIES,
                cities.len()
            )));
        }

        let team_size = self.options.team_size_for(cities.len());
        if team_size == 0 {
            return Err(ClimbError::Configuration(
                "Team size must be greater than 0".to_string(),
            ));
        }

        let concurrent_teams = self.options.concurrent_teams_for(team_size);
        if concurrent_teams == 0 {
            return Err(ClimbError::Configuration(
                "Concurrent teams must be greater than 0".to_string(),
            ));
        }

        let log_level = self.options.get_log_level();
        if log_level != LogLevel::None {
            info!(
                cities = cities.len(),
                restarts, team_size, concurrent_teams, "starting random-restart 2-opt"
            );
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(concurrent_teams.min(restarts))
            .thread_name(|index| format!("twoopt-team-{}", index))
            .build()
            .allocation_context("cannot build the team pool")?;

        let best = GlobalBest::new();
        pool.install(|| {
            (0..restarts).into_par_iter().try_for_each(|restart| {
                let seed = self.options.seed_for(restart);
                Climber::new(cities, restart, seed, team_size)?
                    .with_log_level(log_level)
                    .climb(&best)
                    .map(|_| ())
            })
        })?;

        let best_length = best.best_length().ok_or_else_climb(|| {
            ClimbError::Other("every restart finished without reporting a length".to_string())
        })?;

        let report = ClimbReport {
            best_length,
            total_climbs: best.climbs(),
            restarts,
            cities: cities.len(),
        };

        if log_level != LogLevel::None {
            info!(
                best_length = report.best_length,
                climbs = report.total_climbs,
                moves = %report.evaluated_moves(),
                "random-restart 2-opt finished"
            );
        }

        Ok(report)
    }
}

/// Runs `restarts` restarts on `coordinates` with default options.
///
/// # Example
///
/// ```rust
/// let coordinates: Vec<(f32, f32)> = (0..100)
///     .map(|k| ((k % 10) as f32 * 10.0, (k / 10) as f32 * 10.0))
///     .collect();
/// let report = twoopt::solve(&coordinates, 2).unwrap();
/// assert!(report.best_length >= 1000);
/// assert!(report.total_climbs >= 2);
/// ```
pub fn solve(coordinates: &[(f32, f32)], restarts: usize) -> Result<ClimbReport> {
    let cities = Cities::from_coordinates(coordinates)?;
    RestartCoordinator::default().solve(&cities, restarts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluated_moves() {
        let report = ClimbReport {
            best_length: 0,
            total_climbs: 3,
            restarts: 1,
            cities: 100,
        };
        assert_eq!(report.evaluated_moves(), 3 * 98 * 99 / 2);
    }

    #[test]
    fn test_rejects_zero_restarts() {
        let cities = Cities::grid(10).unwrap();
        let result = RestartCoordinator::default().solve(&cities, 0);
        match result {
            Err(ClimbError::InvalidInput(msg)) => assert!(msg.contains("restart count")),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_zero_team_size() {
        let cities = Cities::grid(10).unwrap();
        let options = ClimbOptions::builder().team_size(0).build();
        let result = RestartCoordinator::new(options).solve(&cities, 1);
        assert!(matches!(result, Err(ClimbError::Configuration(_))));
    }

    #[test]
    fn test_rejects_zero_concurrency() {
        let cities = Cities::grid(10).unwrap();
        let options = ClimbOptions::builder().concurrent_teams(0).build();
        let result = RestartCoordinator::new(options).solve(&cities, 1);
        assert!(matches!(result, Err(ClimbError::Configuration(_))));
    }
}
