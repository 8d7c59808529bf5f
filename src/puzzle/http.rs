//! Puzzle repository backed by the puzzle server's REST API.
//!
//! Endpoints (relative to the base URL, e.g. `http://localhost:5000/api`):
//!   GET /positions/random            -> {"id", "fen", "difficulty", "tags"}
//!   GET /positions/by-index/{index}  -> same shape
//!   GET /positions/count             -> {"total"}
//!   GET /positions/{id}/solution     -> {"solution"}
//! Failures come back as {"error": "..."}, usually with a 404 or 500 status.

use super::notation::parse_solution;
use super::repository::{PuzzleRepository, RepositoryError};
use super::types::{PuzzleId, PuzzleRecord, SolutionMove};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

const USER_AGENT: &str = "mate-trainer";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct PositionBody {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    fen: Option<String>,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CountBody {
    #[serde(default)]
    total: usize,
}

#[derive(Debug, Deserialize)]
struct SolutionBody {
    #[serde(default)]
    solution: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Where a request is aimed, so a 404 can be reported precisely.
enum Lookup {
    Random,
    Index(usize),
    Id(PuzzleId),
    Count,
}

pub struct HttpRepository {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpRepository {
    pub fn new(base_url: &str) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        lookup: Lookup,
    ) -> Result<T, RepositoryError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self
            .agent
            .get(&url)
            .set("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| match e {
                ureq::Error::Status(404, _) => not_found(lookup),
                ureq::Error::Status(code, _) => {
                    RepositoryError::Http(format!("{} returned HTTP {}", url, code))
                }
                ureq::Error::Transport(t) => RepositoryError::Http(t.to_string()),
            })?;

        response
            .into_json::<T>()
            .map_err(|e| RepositoryError::Parse(e.to_string()))
    }

    fn position(
        &self,
        path: &str,
        lookup: Lookup,
        index: Option<usize>,
    ) -> Result<PuzzleRecord, RepositoryError> {
        let body: PositionBody = self.get_json(path, lookup)?;
        into_record(body, index)
    }
}

impl PuzzleRepository for HttpRepository {
    fn random(&self) -> Result<PuzzleRecord, RepositoryError> {
        self.position("/positions/random", Lookup::Random, None)
    }

    fn by_index(&self, index: usize) -> Result<PuzzleRecord, RepositoryError> {
        self.position(
            &format!("/positions/by-index/{}", index),
            Lookup::Index(index),
            Some(index),
        )
    }

    fn count(&self) -> Result<usize, RepositoryError> {
        let body: CountBody = self.get_json("/positions/count", Lookup::Count)?;
        Ok(body.total)
    }

    fn solution(&self, id: PuzzleId) -> Result<Vec<SolutionMove>, RepositoryError> {
        let path = format!("/positions/{}/solution", id.0);
        let body: SolutionBody = self.get_json(&path, Lookup::Id(id))?;
        if let Some(error) = body.error {
            return Err(RepositoryError::Http(error));
        }
        let raw = body.solution.ok_or(RepositoryError::NotFound(id))?;
        Ok(parse_solution(&raw))
    }
}

fn not_found(lookup: Lookup) -> RepositoryError {
    match lookup {
        Lookup::Id(id) => RepositoryError::NotFound(id),
        // The server does not report the count on a miss
        Lookup::Index(index) => RepositoryError::IndexOutOfRange { index, count: index },
        Lookup::Random | Lookup::Count => RepositoryError::Empty,
    }
}

fn into_record(body: PositionBody, index: Option<usize>) -> Result<PuzzleRecord, RepositoryError> {
    if let Some(error) = body.error {
        return Err(RepositoryError::Http(error));
    }
    let fen = body
        .fen
        .filter(|f| !f.trim().is_empty())
        .ok_or_else(|| RepositoryError::Parse("position has no FEN".to_string()))?;
    let id = body
        .id
        .ok_or_else(|| RepositoryError::Parse("position has no id".to_string()))?;

    Ok(PuzzleRecord {
        id: PuzzleId(id),
        index,
        fen,
        // Served separately by /solution
        solution: Vec::new(),
        difficulty: body.difficulty.unwrap_or_else(|| "mate_in_2".to_string()),
        tags: body.tags,
        title: None,
    })
}
