//! Line-oriented command parsing for the interactive trainer.

pub mod board;

use crate::constants::MAX_MATE_IN;
use crate::rules::{PromotionPiece, Square};
use crate::session::Mode;
use thiserror::Error;

/// A command typed at the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move {
        from: Square,
        to: Square,
        promotion: Option<PromotionPiece>,
    },
    Undo,
    Reset,
    Hint,
    Solution,
    SetMode(Mode),
    Next,
    Previous,
    /// 1-based puzzle number
    Goto(usize),
    New,
    GiveUp,
    Status,
    Stats,
    Board,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}' (type 'help')")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),
}

const MOVE_USAGE: &str = "move <from><to> [q|r|b|n], e.g. move e2e4";
const MODE_USAGE: &str = "mode free | mode mate <N>";
const GOTO_USAGE: &str = "goto <puzzle number>";

pub const HELP: &str = "\
Commands:
  e2e4 / move e2e4 [q]  Play a move (optional promotion piece)
  undo                  Take back your last move
  reset                 Restart this puzzle
  hint                  Show which piece to move
  solution              Show the full solution
  mode free|mate N      Switch between free play and mate-in-N
  next / prev / goto N  Move through the puzzle list
  new                   Load a new puzzle
  giveup                Abandon this puzzle
  board / status        Show the board / session status
  stats                 Show your statistics
  quit                  Exit";

/// Parse one input line. `Ok(None)` for a blank line.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(first) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();
    let keyword = first.to_ascii_lowercase();

    let command = match keyword.as_str() {
        "move" | "m" => {
            let [coords, extra @ ..] = rest.as_slice() else {
                return Err(CommandError::Usage(MOVE_USAGE));
            };
            parse_move(coords, extra.first().copied()).ok_or(CommandError::Usage(MOVE_USAGE))?
        }
        "undo" | "u" => Command::Undo,
        "reset" => Command::Reset,
        "hint" | "h" => Command::Hint,
        "solution" | "solve" => Command::Solution,
        "mode" => parse_mode(&rest).ok_or(CommandError::Usage(MODE_USAGE))?,
        "next" | "n" => Command::Next,
        "prev" | "previous" | "p" => Command::Previous,
        "goto" | "g" => rest
            .first()
            .and_then(|n| n.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .map(Command::Goto)
            .ok_or(CommandError::Usage(GOTO_USAGE))?,
        "new" => Command::New,
        "giveup" | "abandon" | "resign" => Command::GiveUp,
        "status" => Command::Status,
        "stats" => Command::Stats,
        "board" | "b" => Command::Board,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        // Bare coordinates: "e2e4" or "e7e8q"
        _ => parse_move(&keyword, rest.first().copied())
            .ok_or_else(|| CommandError::Unknown(first.to_string()))?,
    };
    Ok(Some(command))
}

/// `e2e4`, `e7e8q`, or `e7e8` followed by a separate promotion letter.
fn parse_move(coords: &str, promotion: Option<&str>) -> Option<Command> {
    let coords = coords.to_ascii_lowercase();
    if !coords.is_ascii() || !(4..=5).contains(&coords.len()) {
        return None;
    }
    let from = Square::parse(&coords[0..2])?;
    let to = Square::parse(&coords[2..4])?;

    let inline = coords[4..].chars().next();
    let separate = match promotion {
        Some(word) if word.chars().count() == 1 => word.chars().next(),
        Some(_) => return None,
        None => None,
    };
    let promotion = match inline.or(separate) {
        Some(c) => Some(PromotionPiece::from_char(c)?),
        None => None,
    };
    Some(Command::Move {
        from,
        to,
        promotion,
    })
}

fn parse_mode(args: &[&str]) -> Option<Command> {
    match args {
        ["free"] => Some(Command::SetMode(Mode::FreePlay)),
        ["mate", n] => n
            .parse::<u32>()
            .ok()
            .filter(|&n| (1..=MAX_MATE_IN).contains(&n))
            .map(|n| Command::SetMode(Mode::mate_in(n))),
        _ => None,
    }
}
