//! Status decision after each applied move.

use super::types::{FailReason, Mode, Session, Status};
use crate::rules::{RulesEngine, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ongoing,
    Solved,
    Failed(FailReason),
    Drawn,
}

impl Outcome {
    pub fn status(self) -> Status {
        match self {
            Self::Ongoing => Status::InProgress,
            Self::Solved => Status::Solved,
            Self::Failed(reason) => Status::Failed(reason),
            Self::Drawn => Status::Drawn,
        }
    }
}

/// Decide the session outcome after `mover` has just moved.
///
/// Checkmate wins over a draw, and both win over the move limit, so a mate
/// delivered on the last allowed ply still counts.
pub fn evaluate<E: RulesEngine>(
    engine: &E,
    session: &Session<E::Position>,
    mover: Side,
) -> Outcome {
    let position = session.current_position();

    if engine.is_checkmate(position) {
        return match session.mode() {
            Mode::FreePlay => Outcome::Solved,
            Mode::Constrained(_) if mover == session.player_side() => Outcome::Solved,
            Mode::Constrained(_) => Outcome::Failed(FailReason::OpponentMated),
        };
    }

    if engine.is_stalemate(position) || engine.is_draw(position) {
        return Outcome::Drawn;
    }

    if let Mode::Constrained(max_plies) = session.mode() {
        if session.ply_count() >= max_plies {
            return Outcome::Failed(FailReason::MoveLimitReached);
        }
    }

    Outcome::Ongoing
}

/// One-line description of the position for status displays.
pub fn describe_position<E: RulesEngine>(engine: &E, position: &E::Position) -> Option<String> {
    let side = engine.side_to_move(position);
    if engine.is_checkmate(position) {
        Some(format!("Checkmate! {} wins", side.opponent()))
    } else if engine.is_stalemate(position) {
        Some("Stalemate".to_string())
    } else if engine.is_draw(position) {
        Some("Draw".to_string())
    } else if engine.is_check(position) {
        Some(format!("{} is in check", side))
    } else {
        None
    }
}
