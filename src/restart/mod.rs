pub mod best;
pub mod coordinator;
pub mod options;

pub use best::GlobalBest;
pub use coordinator::{solve, ClimbReport, RestartCoordinator, MIN_CITIES};
pub use options::{best_team_size, ClimbOptions, LogLevel};
