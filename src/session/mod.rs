//! Puzzle session core: history, turn scheduling, outcome evaluation and the
//! controller that ties them together.

pub mod controller;
pub mod error;
pub mod history;
pub mod outcome;
pub mod scheduler;
#[cfg(test)]
pub(crate) mod scripted;
pub mod types;

pub use controller::{ControllerOptions, MoveReport, SessionController, TickOutcome, UndoReport};
pub use error::SessionError;
pub use history::{HistoryEntry, HistoryError, HistoryStack};
pub use outcome::Outcome;
pub use scheduler::{PendingReply, ReplyTicket, TurnScheduler};
pub use types::*;
