//! Integration test: puzzle files, sequential order and stats persistence
//!
//! Loads puzzles from a JSON file on disk, plays them in sequential order,
//! and checks that results survive a save/load of the stats file.

use mate_trainer::config::{AppConfig, PuzzleSource};
use mate_trainer::puzzle::{MemoryRepository, PuzzleRepository, RepositoryError};
use mate_trainer::rules::{ChessEngineRules, Square};
use mate_trainer::session::{Mode, PuzzleOrder, SessionController, SessionError, Status};
use mate_trainer::stats::{PuzzleStats, StatsStore};
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

const PUZZLES: &str = r#"[
    {"fen": "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", "solution": "1. Ra8#", "difficulty": "mate_in_1", "title": "Corridor"},
    {"fen": "k7/8/2K5/8/8/8/8/7R w - - 0 1", "solution": "1. Kb6 Kb8 2. Rh8#", "difficulty": "mate_in_2"},
    {"fen": "not a position", "solution": "", "difficulty": "mate_in_1"}
]"#;

fn temp_dir() -> PathBuf {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let dir = std::env::temp_dir().join(format!(
        "mate-trainer-it-{}-{}",
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::SeqCst)
    ));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn file_repository() -> MemoryRepository {
    let path = temp_dir().join("puzzles.json");
    fs::write(&path, PUZZLES).unwrap();
    MemoryRepository::from_json_file(&path).unwrap()
}

fn sequential_controller() -> SessionController<ChessEngineRules, MemoryRepository> {
    let config = AppConfig {
        order: PuzzleOrder::Sequential,
        source: PuzzleSource::File {
            path: PathBuf::from("puzzles.json"),
        },
        ..AppConfig::instant(5)
    };
    SessionController::new(
        ChessEngineRules::new(),
        file_repository(),
        config.controller_options(),
    )
}

#[test]
fn test_file_repository_contents() {
    let repo = file_repository();
    assert_eq!(repo.count().unwrap(), 3);

    let first = repo.by_index(0).unwrap();
    assert_eq!(first.label(), "Corridor (#1)");
    assert_eq!(first.mate_in(), Some(1));
    assert!(matches!(
        repo.by_index(3),
        Err(RepositoryError::IndexOutOfRange { index: 3, count: 3 })
    ));
}

#[test]
fn test_sequential_play_through_file() {
    let mut c = sequential_controller();
    c.load_new().unwrap();
    assert_eq!(c.puzzle().unwrap().index, Some(0));
    assert_eq!(c.mode(), Mode::Constrained(2));

    let report = c
        .attempt_move(Square::parse("a1").unwrap(), Square::parse("a8").unwrap(), None)
        .unwrap();
    assert_eq!(report.status, Status::Solved);

    c.load_new().unwrap();
    assert_eq!(c.puzzle().unwrap().index, Some(1));
    assert_eq!(c.mode(), Mode::Constrained(4));
    assert_eq!(c.ply_count(), 0);
}

#[test]
fn test_bad_position_in_file_is_rejected() {
    let mut c = sequential_controller();
    c.load_by_index(1).unwrap();

    let err = c.next().unwrap_err();
    assert!(matches!(err, SessionError::InvalidPosition(_)));
    // The previous puzzle is still loaded
    assert_eq!(c.puzzle().unwrap().index, Some(1));
    assert_eq!(c.status(), Some(Status::InProgress));
}

#[test]
fn test_stats_survive_restart() {
    let path = temp_dir().join("stats.dat");
    let store = StatsStore::at(&path);
    assert_eq!(store.load_or_default().unwrap(), PuzzleStats::default());

    let mut stats = PuzzleStats::default();
    stats.record(Status::Solved, 40);
    stats.record(Status::Aborted, 3);
    store.save(&stats).unwrap();

    let reopened = StatsStore::at(&path);
    let loaded = reopened.load().unwrap();
    assert_eq!(loaded.puzzles_solved, 1);
    assert_eq!(loaded.puzzles_attempted, 2);
    assert_eq!(loaded.best_time_secs, Some(40));
    assert_eq!(loaded.success_rate(), 50.0);
}
