//! # Local Search
//!
//! 2-opt local search run by barrier-synchronized worker teams.
//!
//! A [`Climber`] owns one restart. Each of its passes is executed by a
//! [`Team`] of workers that split the edge gain table, the move scan and the
//! segment reversal between them, and agree on a single move through a tree
//! reduction (see [`selector`]). Candidate partners are staged in
//! fixed-capacity tiles (see [`tile`]).

pub mod climber;
pub mod selector;
pub mod team;
pub mod tile;

pub use climber::{Climber, RestartOutcome};
pub use selector::{move_change, pass, TwoOptMove};
pub use team::{Team, Worker};
pub use tile::TILE_SIZE;
