//! # ClimbOptions
//!
//! The `ClimbOptions` struct represents the configuration of a
//! random-restart run: how many workers cooperate on each restart, how many
//! restarts run at the same time, how restart seeds are derived and how much
//! is logged.
//!
//! ## Example
//!
//! ```rust
//! use twoopt::restart::options::{ClimbOptions, LogLevel};
//!
//! // Create a new ClimbOptions instance with custom parameters
//! let custom_options = ClimbOptions::new(4, 2, LogLevel::Minimal);
//!
//! // Create a new ClimbOptions instance with default parameters
//! let default_options = ClimbOptions::default();
//! assert_eq!(default_options.get_seed_offset(), 0);
//! ```
//!
//! ## Fields
//!
//! - `team_size`: workers per restart; chosen from the instance size when unset.
//! - `concurrent_teams`: restarts running at once; chosen from the hardware when unset.
//! - `seed_offset`: restart `r` shuffles its tour with seed `seed_offset + r`.
//! - `log_level`: how much the run reports through `tracing`.

use std::num::NonZeroUsize;
use std::thread;

/// Upper bound for the automatically chosen team size.
pub const MAX_AUTO_TEAM_SIZE: usize = 8;

/// How much a run reports through `tracing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LogLevel {
    /// Run summary, every converged restart and every pass.
    Verbose,
    /// Run summary and every converged restart.
    Minimal,
    /// Nothing.
    #[default]
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClimbOptions {
    team_size: Option<usize>,
    concurrent_teams: Option<usize>,
    seed_offset: u32,
    log_level: LogLevel,
}

impl ClimbOptions {
    pub fn new(team_size: usize, concurrent_teams: usize, log_level: LogLevel) -> Self {
        Self {
            team_size: Some(team_size),
            concurrent_teams: Some(concurrent_teams),
            seed_offset: 0,
            log_level,
        }
    }

    /// Workers per restart, if fixed.
    pub fn get_team_size(&self) -> Option<usize> {
        self.team_size
    }

    /// Restarts running at once, if fixed.
    pub fn get_concurrent_teams(&self) -> Option<usize> {
        self.concurrent_teams
    }

    pub fn get_seed_offset(&self) -> u32 {
        self.seed_offset
    }

    pub fn get_log_level(&self) -> LogLevel {
        self.log_level
    }

    /// Team size for an instance of `cities` cities.
    pub fn team_size_for(&self, cities: usize) -> usize {
        self.team_size.unwrap_or_else(|| best_team_size(cities))
    }

    /// Number of teams to run at once for teams of `team_size` workers.
    pub fn concurrent_teams_for(&self, team_size: usize) -> usize {
        self.concurrent_teams
            .unwrap_or_else(|| (available_parallelism() / team_size.max(1)).max(1))
    }

    /// Seed of restart `restart`.
    pub fn seed_for(&self, restart: usize) -> u32 {
        self.seed_offset.wrapping_add(restart as u32)
    }

    /// Sets the team size.
    pub fn set_team_size(&mut self, team_size: usize) {
        self.team_size = Some(team_size);
    }

    /// Sets the number of concurrent teams.
    pub fn set_concurrent_teams(&mut self, concurrent_teams: usize) {
        self.concurrent_teams = Some(concurrent_teams);
    }

    /// Sets the seed offset.
    pub fn set_seed_offset(&mut self, seed_offset: u32) {
        self.seed_offset = seed_offset;
    }

    /// Sets the log level.
    pub fn set_log_level(&mut self, log_level: LogLevel) {
        self.log_level = log_level;
    }

    /// Returns a builder for creating a `ClimbOptions` instance.
    ///
    /// # Example
    ///
    /// ```rust
    /// use twoopt::restart::options::{ClimbOptions, LogLevel};
    ///
    /// let options = ClimbOptions::builder()
    ///     .team_size(4)
    ///     .concurrent_teams(2)
    ///     .seed_offset(1000)
    ///     .log_level(LogLevel::Minimal)
    ///     .build();
    /// assert_eq!(options.seed_for(5), 1005);
    /// ```
    pub fn builder() -> ClimbOptionsBuilder {
        ClimbOptionsBuilder::default()
    }
}

/// Builder for `ClimbOptions`.
#[derive(Debug, Clone, Default)]
pub struct ClimbOptionsBuilder {
    team_size: Option<usize>,
    concurrent_teams: Option<usize>,
    seed_offset: Option<u32>,
    log_level: Option<LogLevel>,
}

impl ClimbOptionsBuilder {
    /// Sets the team size.
    pub fn team_size(mut self, value: usize) -> Self {
        self.team_size = Some(value);
        self
    }

    /// Sets the number of concurrent teams.
    pub fn concurrent_teams(mut self, value: usize) -> Self {
        self.concurrent_teams = Some(value);
        self
    }

    /// Sets the seed offset.
    pub fn seed_offset(mut self, value: u32) -> Self {
        self.seed_offset = Some(value);
        self
    }

    /// Sets the log level.
    pub fn log_level(mut self, value: LogLevel) -> Self {
        self.log_level = Some(value);
        self
    }

    /// Builds the `ClimbOptions` instance.
    pub fn build(self) -> ClimbOptions {
        ClimbOptions {
            team_size: self.team_size,
            concurrent_teams: self.concurrent_teams,
            seed_offset: self.seed_offset.unwrap_or(0),
            log_level: self.log_level.unwrap_or_default(),
        }
    }
}

/// Default team size for an instance of `cities` cities: the hardware
/// parallelism, capped at [`MAX_AUTO_TEAM_SIZE`] and at the number of rows
/// a pass scans.
pub fn best_team_size(cities: usize) -> usize {
    available_parallelism()
        .min(MAX_AUTO_TEAM_SIZE)
        .min(cities.saturating_sub(2))
        .max(1)
}

fn available_parallelism() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ClimbOptions::default();
        assert_eq!(options.get_team_size(), None);
        assert_eq!(options.get_concurrent_teams(), None);
        assert_eq!(options.get_seed_offset(), 0);
        assert_eq!(options.get_log_level(), LogLevel::None);
        assert_eq!(options, ClimbOptions::builder().build());
    }

    #[test]
    fn test_resolved_sizes() {
        let options = ClimbOptions::default();
        let team = options.team_size_for(1000);
        assert!((1..=MAX_AUTO_TEAM_SIZE).contains(&team));
        assert!(options.concurrent_teams_for(team) >= 1);
        assert_eq!(best_team_size(3), 1);

        let fixed = ClimbOptions::new(3, 5, LogLevel::None);
        assert_eq!(fixed.team_size_for(1000), 3);
        assert_eq!(fixed.concurrent_teams_for(3), 5);
    }

    #[test]
    fn test_seed_for_wraps() {
        let mut options = ClimbOptions::default();
        assert_eq!(options.seed_for(7), 7);
        options.set_seed_offset(u32::MAX);
        assert_eq!(options.seed_for(1), 0);
    }

    #[test]
    fn test_setters() {
        let mut options = ClimbOptions::default();
        options.set_team_size(2);
        options.set_concurrent_teams(6);
        options.set_log_level(LogLevel::Verbose);
        assert_eq!(options.get_team_size(), Some(2));
        assert_eq!(options.get_concurrent_teams(), Some(6));
        assert_eq!(options.get_log_level(), LogLevel::Verbose);
    }
}
