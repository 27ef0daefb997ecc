pub mod city;
pub mod error;
pub mod restart;
pub mod rng;
pub mod search;
pub mod tour;

// Re-export commonly used types for convenience
pub use city::{Cities, City, Length};
pub use error::{ClimbError, OptionExt, Result, ResultExt};
pub use restart::{solve, ClimbOptions, ClimbReport, LogLevel, RestartCoordinator};
pub use search::{Climber, RestartOutcome, TwoOptMove};
pub use tour::Tour;
