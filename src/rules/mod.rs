//! Rules engine seam: the capability the session core consumes for legal-move
//! generation, move application and game-end detection.

pub mod chess_board;

pub use chess_board::{ChessEngineRules, ChessMove, ChessPosition};

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A side of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// FEN active-color letter.
    pub fn fen_char(self) -> char {
        match self {
            Self::White => 'w',
            Self::Black => 'b',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::White => "White",
            Self::Black => "Black",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A board square. `file` 0-7 = a-h, `rank` 0-7 = 1-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    pub file: u8,
    pub rank: u8,
}

impl Square {
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        (file < 8 && rank < 8).then_some(Self { file, rank })
    }

    /// Parse coordinate notation such as `"e4"`.
    pub fn parse(text: &str) -> Option<Self> {
        let mut chars = text.chars();
        let file = chars.next()?;
        let rank = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            return None;
        }
        Self::new(file as u8 - b'a', rank as u8 - b'1')
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            (b'a' + self.file) as char,
            (b'1' + self.rank) as char
        )
    }
}

/// Piece kinds, independent of color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceKind {
    /// Uppercase SAN letter (`None` for pawns).
    pub fn san_letter(self) -> Option<char> {
        match self {
            Self::King => Some('K'),
            Self::Queen => Some('Q'),
            Self::Rook => Some('R'),
            Self::Bishop => Some('B'),
            Self::Knight => Some('N'),
            Self::Pawn => None,
        }
    }

    pub fn from_san_letter(letter: char) -> Option<Self> {
        match letter {
            'K' => Some(Self::King),
            'Q' => Some(Self::Queen),
            'R' => Some(Self::Rook),
            'B' => Some(Self::Bishop),
            'N' => Some(Self::Knight),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::King => "King",
            Self::Queen => "Queen",
            Self::Rook => "Rook",
            Self::Bishop => "Bishop",
            Self::Knight => "Knight",
            Self::Pawn => "Pawn",
        }
    }
}

/// Piece requested when a pawn reaches the last rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromotionPiece {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl PromotionPiece {
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'q' => Some(Self::Queen),
            'r' => Some(Self::Rook),
            'b' => Some(Self::Bishop),
            'n' => Some(Self::Knight),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("illegal move {from}{to}")]
    IllegalMove { from: Square, to: Square },

    #[error("invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },
}

/// Legal-move generation and game-end detection for a position type.
///
/// Positions are immutable values: applying a move returns a new position.
pub trait RulesEngine {
    type Position: Clone + PartialEq + fmt::Debug;
    type Move: Clone + fmt::Debug;

    fn parse_position(&self, fen: &str) -> Result<Self::Position, RulesError>;

    /// Legal moves in `position`, keeping only those made by pieces of
    /// `restrict_to` when given.
    fn legal_moves(&self, position: &Self::Position, restrict_to: Option<Side>) -> Vec<Self::Move>;

    /// Turn a from/to pair (plus promotion choice) into a legal move.
    fn resolve_move(
        &self,
        position: &Self::Position,
        from: Square,
        to: Square,
        promotion: Option<PromotionPiece>,
    ) -> Result<Self::Move, RulesError>;

    fn apply_move(
        &self,
        position: &Self::Position,
        mv: &Self::Move,
    ) -> Result<Self::Position, RulesError>;

    fn side_to_move(&self, position: &Self::Position) -> Side;

    fn is_check(&self, position: &Self::Position) -> bool;

    fn is_checkmate(&self, position: &Self::Position) -> bool;

    fn is_stalemate(&self, position: &Self::Position) -> bool;

    /// Any drawing condition, stalemate included.
    fn is_draw(&self, position: &Self::Position) -> bool;

    /// Short algebraic text for `mv` played from `position`.
    fn describe_move(&self, position: &Self::Position, mv: &Self::Move) -> String;
}
