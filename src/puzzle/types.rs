//! Puzzle records and structured solution moves.

use crate::rules::{PieceKind, Square};
use crate::constants::MAX_MATE_IN;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Repository identity of a puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PuzzleId(pub u64);

impl fmt::Display for PuzzleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Check annotation carried by a solution move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckMark {
    None,
    Check,
    Mate,
}

/// One move of a canonical solution, parsed from SAN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionMove {
    /// The token as written in the source, e.g. `"Rf8#"`.
    pub san: String,
    pub piece: PieceKind,
    /// Destination square. `None` for castling.
    pub target: Option<Square>,
    pub check: CheckMark,
}

impl SolutionMove {
    pub fn gives_check(&self) -> bool {
        self.check != CheckMark::None
    }

    pub fn hint(&self) -> Hint {
        Hint {
            piece: self.piece,
            target: self.target,
            is_check: self.gives_check(),
        }
    }
}

/// Partial description of the next canonical move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hint {
    pub piece: PieceKind,
    pub target: Option<Square>,
    pub is_check: bool,
}

impl fmt::Display for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move the {}", self.piece.name())?;
        if let Some(target) = self.target {
            write!(f, " to {}", target.to_string().to_uppercase())?;
        }
        if self.is_check {
            f.write_str(" (check!)")?;
        }
        Ok(())
    }
}

/// A puzzle as supplied by a repository. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuzzleRecord {
    pub id: PuzzleId,
    /// Ordinal position in the repository, when known.
    pub index: Option<usize>,
    /// Starting position in FEN.
    pub fen: String,
    /// Canonical solution. May be empty when the source serves it separately.
    pub solution: Vec<SolutionMove>,
    /// Difficulty label such as `mate_in_2`.
    pub difficulty: String,
    pub tags: Vec<String>,
    pub title: Option<String>,
}

impl PuzzleRecord {
    /// `N` from a `mate_in_N` difficulty label.
    pub fn mate_in(&self) -> Option<u32> {
        self.difficulty
            .strip_prefix("mate_in_")
            .and_then(|n| n.parse().ok())
            .filter(|&n| (1..=MAX_MATE_IN).contains(&n))
    }

    /// Display name: the title, or the id.
    pub fn label(&self) -> String {
        match &self.title {
            Some(title) => format!("{} ({})", title, self.id),
            None => format!("Puzzle {}", self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fen: &str, difficulty: &str) -> PuzzleRecord {
        PuzzleRecord {
            id: PuzzleId(7),
            index: Some(0),
            fen: fen.to_string(),
            solution: Vec::new(),
            difficulty: difficulty.to_string(),
            tags: Vec::new(),
            title: None,
        }
    }

    #[test]
    fn test_mate_in_from_difficulty() {
        assert_eq!(record("8/8/8/8/8/8/8/8 w", "mate_in_2").mate_in(), Some(2));
        assert_eq!(record("8/8/8/8/8/8/8/8 w", "mate_in_1").mate_in(), Some(1));
        assert_eq!(record("8/8/8/8/8/8/8/8 w", "mate_in_0").mate_in(), None);
        assert_eq!(record("8/8/8/8/8/8/8/8 w", "tactics").mate_in(), None);
        assert_eq!(record("8/8/8/8/8/8/8/8 w", "mate_in_3000000000").mate_in(), None);
        assert_eq!(record("8/8/8/8/8/8/8/8 w", "mate_in_99").mate_in(), None);
    }

    #[test]
    fn test_hint_display() {
        let hint = Hint {
            piece: PieceKind::Queen,
            target: Square::parse("f7"),
            is_check: true,
        };
        assert_eq!(hint.to_string(), "Move the Queen to F7 (check!)");

        let castle = Hint {
            piece: PieceKind::King,
            target: None,
            is_check: false,
        };
        assert_eq!(castle.to_string(), "Move the King");
    }

    #[test]
    fn test_label() {
        let mut r = record("k7/8/8/8/8/8/8/K7 w", "mate_in_1");
        assert_eq!(r.label(), "Puzzle #7");
        r.title = Some("Corner".to_string());
        assert_eq!(r.label(), "Corner (#7)");
    }
}
