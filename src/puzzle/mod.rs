//! Puzzle records and the repositories that supply them.

pub mod http;
pub mod notation;
pub mod puzzles;
pub mod repository;
pub mod types;

pub use http::HttpRepository;
pub use repository::{MemoryRepository, PuzzleEntry, PuzzleRepository, RepositoryError};
pub use types::*;
