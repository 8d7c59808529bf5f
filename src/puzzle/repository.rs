//! Puzzle sources: the repository seam and the in-memory implementation.

use super::notation::parse_solution;
use super::puzzles::builtin_entries;
use super::types::{PuzzleId, PuzzleRecord, SolutionMove};
use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("puzzle {0} not found")]
    NotFound(PuzzleId),

    #[error("puzzle index {index} out of range (count {count})")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("no puzzles available")]
    Empty,

    #[error("could not reach puzzle server: {0}")]
    Http(String),

    #[error("could not read puzzles: {0}")]
    Io(#[from] io::Error),

    #[error("invalid puzzle data: {0}")]
    Parse(String),
}

/// Supplier of puzzle records.
pub trait PuzzleRepository {
    fn random(&self) -> Result<PuzzleRecord, RepositoryError>;

    fn by_index(&self, index: usize) -> Result<PuzzleRecord, RepositoryError>;

    fn count(&self) -> Result<usize, RepositoryError>;

    /// Canonical solution of a puzzle, already parsed.
    fn solution(&self, id: PuzzleId) -> Result<Vec<SolutionMove>, RepositoryError>;
}

/// Puzzle entry as written in JSON puzzle files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleEntry {
    #[serde(default)]
    pub id: Option<u64>,
    pub fen: String,
    #[serde(default)]
    pub solution: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub title: Option<String>,
}

fn default_difficulty() -> String {
    "mate_in_2".to_string()
}

impl PuzzleEntry {
    fn into_record(self, index: usize) -> PuzzleRecord {
        PuzzleRecord {
            id: PuzzleId(self.id.unwrap_or(index as u64 + 1)),
            index: Some(index),
            solution: parse_solution(&self.solution),
            fen: self.fen,
            difficulty: self.difficulty,
            tags: self.tags,
            title: self.title,
        }
    }
}

/// Repository holding every record in memory, indexed in load order.
#[derive(Debug, Clone)]
pub struct MemoryRepository {
    records: Vec<PuzzleRecord>,
}

impl MemoryRepository {
    pub fn new(entries: Vec<PuzzleEntry>) -> Self {
        let records = entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| entry.into_record(i))
            .collect();
        Self { records }
    }

    /// The puzzle set shipped with the crate.
    pub fn builtin() -> Self {
        Self::new(builtin_entries())
    }

    pub fn from_json_str(json: &str) -> Result<Self, RepositoryError> {
        let entries: Vec<PuzzleEntry> =
            serde_json::from_str(json).map_err(|e| RepositoryError::Parse(e.to_string()))?;
        Ok(Self::new(entries))
    }

    pub fn from_json_file(path: &Path) -> Result<Self, RepositoryError> {
        let json = fs::read_to_string(path)?;
        let repo = Self::from_json_str(&json)?;
        info!("loaded {} puzzles from {}", repo.records.len(), path.display());
        Ok(repo)
    }

    pub fn records(&self) -> &[PuzzleRecord] {
        &self.records
    }
}

impl PuzzleRepository for MemoryRepository {
    fn random(&self) -> Result<PuzzleRecord, RepositoryError> {
        if self.records.is_empty() {
            return Err(RepositoryError::Empty);
        }
        let idx = rand::thread_rng().gen_range(0..self.records.len());
        Ok(self.records[idx].clone())
    }

    fn by_index(&self, index: usize) -> Result<PuzzleRecord, RepositoryError> {
        self.records
            .get(index)
            .cloned()
            .ok_or(RepositoryError::IndexOutOfRange {
                index,
                count: self.records.len(),
            })
    }

    fn count(&self) -> Result<usize, RepositoryError> {
        Ok(self.records.len())
    }

    fn solution(&self, id: PuzzleId) -> Result<Vec<SolutionMove>, RepositoryError> {
        self.records
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.solution.clone())
            .ok_or(RepositoryError::NotFound(id))
    }
}
