//! Lifetime solve statistics and their on-disk store.

pub mod persistence;
pub mod tracker;
pub mod types;

pub use persistence::StatsStore;
pub use tracker::ResultTracker;
pub use types::{format_clock, PuzzleStats, SolveTimer};
