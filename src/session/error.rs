use super::history::HistoryError;
use crate::puzzle::RepositoryError;
use crate::rules::{RulesError, Side, Square};
use thiserror::Error;

/// Reasons a session command is refused. None of them change session state.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("illegal move {from}{to}")]
    IllegalMove { from: Square, to: Square },

    #[error("not your turn")]
    NotYourTurn,

    #[error("nothing to undo")]
    NothingToUndo,

    #[error(transparent)]
    OutOfRange(#[from] HistoryError),

    #[error("{0} has no legal reply")]
    NoLegalMovesForAutomatedSide(Side),

    #[error("no puzzle loaded")]
    NoPuzzleLoaded,

    #[error("no hint available at ply {ply}")]
    NoHintAvailable { ply: u32 },

    #[error("already at the first puzzle")]
    AtFirstPuzzle,

    #[error("already at the last puzzle")]
    AtLastPuzzle,

    #[error("puzzle position is invalid: {0}")]
    InvalidPosition(RulesError),

    #[error("could not load puzzle: {0}")]
    Load(#[from] RepositoryError),
}

impl From<RulesError> for SessionError {
    fn from(err: RulesError) -> Self {
        match err {
            RulesError::IllegalMove { from, to } => Self::IllegalMove { from, to },
            invalid @ RulesError::InvalidFen { .. } => Self::InvalidPosition(invalid),
        }
    }
}
