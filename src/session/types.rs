//! Session data structures and state.

use super::history::{HistoryError, HistoryStack};
use super::scheduler::PendingReply;
use crate::puzzle::PuzzleRecord;
use crate::rules::Side;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// How a puzzle is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Unlimited plies; the human moves both sides
    FreePlay,
    /// Capped at `max_plies`; the opponent replies automatically
    Constrained(u32),
}

impl Mode {
    /// Mate-in-N allows N player moves and the N replies in between.
    pub fn mate_in(moves: u32) -> Self {
        Self::Constrained(moves.max(1).saturating_mul(2))
    }

    /// Constrained mode sized from a `mate_in_N` record, else `fallback`.
    pub fn for_record(record: &PuzzleRecord, fallback: Mode) -> Self {
        match (fallback, record.mate_in()) {
            (Self::Constrained(_), Some(n)) => Self::mate_in(n),
            _ => fallback,
        }
    }

    pub fn max_plies(self) -> Option<u32> {
        match self {
            Self::FreePlay => None,
            Self::Constrained(max) => Some(max),
        }
    }

    pub fn is_constrained(self) -> bool {
        matches!(self, Self::Constrained(_))
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FreePlay => f.write_str("free play"),
            Self::Constrained(max) if max % 2 == 0 => {
                write!(f, "mate in {} ({} plies)", max / 2, max)
            }
            Self::Constrained(max) => write!(f, "constrained ({} plies)", max),
        }
    }
}

/// Which puzzle "new puzzle" picks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PuzzleOrder {
    #[default]
    Random,
    /// Next index, wrapping to the first puzzle
    Sequential,
}

/// Why a session failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailReason {
    OpponentMated,
    MoveLimitReached,
}

/// Session status. Everything but `InProgress` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    InProgress,
    Solved,
    Failed(FailReason),
    Drawn,
    Aborted,
}

impl Status {
    pub fn is_in_progress(self) -> bool {
        self == Self::InProgress
    }

    pub fn is_terminal(self) -> bool {
        !self.is_in_progress()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::InProgress => "in progress",
            Self::Solved => "solved",
            Self::Failed(FailReason::OpponentMated) => "failed: the opponent delivered mate",
            Self::Failed(FailReason::MoveLimitReached) => "failed: move limit reached",
            Self::Drawn => "drawn",
            Self::Aborted => "abandoned",
        };
        f.write_str(text)
    }
}

/// The live aggregate for one attempt at one puzzle.
#[derive(Debug, Clone)]
pub struct Session<P> {
    id: Uuid,
    mode: Mode,
    player_side: Side,
    ply_count: u32,
    status: Status,
    history: HistoryStack<P>,
    pending: Option<PendingReply>,
    /// Set after the opponent had no legal reply; cleared by the player
    replies_blocked: bool,
}

impl<P> Session<P> {
    pub fn new(initial: P, player_side: Side, mode: Mode) -> Self {
        Self {
            id: Uuid::new_v4(),
            mode,
            player_side,
            ply_count: 0,
            status: Status::InProgress,
            history: HistoryStack::new(initial),
            pending: None,
            replies_blocked: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn player_side(&self) -> Side {
        self.player_side
    }

    pub fn opponent_side(&self) -> Side {
        self.player_side.opponent()
    }

    pub fn ply_count(&self) -> u32 {
        self.ply_count
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn current_position(&self) -> &P {
        &self.history.current().position
    }

    pub fn history(&self) -> &HistoryStack<P> {
        &self.history
    }

    pub fn pending(&self) -> Option<PendingReply> {
        self.pending
    }

    /// Whether an automated reply is scheduled (input should be disabled).
    pub fn is_thinking(&self) -> bool {
        self.pending.is_some()
    }

    pub fn replies_blocked(&self) -> bool {
        self.replies_blocked
    }

    /// Plies left before the move limit, in constrained mode.
    pub fn plies_remaining(&self) -> Option<u32> {
        self.mode
            .max_plies()
            .map(|max| max.saturating_sub(self.ply_count))
    }

    /// Append the position reached by a move. Returns the new ply.
    pub(crate) fn record_move(&mut self, position: P) -> u32 {
        self.history.record(position);
        self.ply_count += 1;
        self.ply_count
    }

    /// Drop every position after `index`, keeping the ply count in step.
    pub(crate) fn rewind_to(&mut self, index: usize) -> Result<(), HistoryError> {
        self.history.truncate_to(index)?;
        self.ply_count = (self.history.len() - 1) as u32;
        Ok(())
    }

    pub(crate) fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    pub(crate) fn set_pending(&mut self, pending: PendingReply) -> Option<PendingReply> {
        self.pending.replace(pending)
    }

    pub(crate) fn take_pending(&mut self) -> Option<PendingReply> {
        self.pending.take()
    }

    pub(crate) fn pending_mut(&mut self) -> Option<&mut PendingReply> {
        self.pending.as_mut()
    }

    pub(crate) fn block_replies(&mut self) {
        self.replies_blocked = true;
    }

    pub(crate) fn unblock_replies(&mut self) {
        self.replies_blocked = false;
    }
}
