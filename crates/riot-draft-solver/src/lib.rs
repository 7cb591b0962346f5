//! Game-theoretic solver for champion draft (pick/ban) sequences.
//!
//! [`state::DraftState`] models a snapshot of a fixed 20-slot draft order;
//! [`solver::Solver`] walks that order with memoized minimax, caching
//! [`payoff::Payoff`] results under [`state::DraftState::normalize`] so
//! strategically identical histories are solved only once.

pub mod cache;
pub mod champion;
pub mod error;
pub mod payoff;
pub mod solver;
pub mod state;

pub use cache::{Cache, MapCache};
pub use champion::ChampionId;
pub use error::SolverError;
pub use payoff::Payoff;
pub use solver::{Phase, Solver, UtilityFn};
pub use state::DraftState;
