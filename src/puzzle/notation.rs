//! Parsing of solution strings as stored by puzzle sources.
//!
//! Sources write solutions as free text: `"1. Kb6 Kb8 2. Rh8#"`,
//! `"2... Qh4#"`, sometimes with a trailing `Checkmate` or a game result.
//! Everything here turns that text into structured [`SolutionMove`]s so the
//! session core never handles raw strings.

use super::types::{CheckMark, SolutionMove};
use crate::rules::{PieceKind, Square};
use log::debug;

/// Tokens that carry no move.
const NOISE_TOKENS: &[&str] = &["Checkmate", "checkmate", "1-0", "0-1", "1/2-1/2", "*"];

/// Parse a whole solution string into its moves, dropping move numbers,
/// ellipses, results and anything unparseable.
pub fn parse_solution(raw: &str) -> Vec<SolutionMove> {
    raw.split_whitespace()
        .filter_map(|token| {
            let body = strip_move_number(token);
            if body.is_empty() || NOISE_TOKENS.contains(&body) {
                return None;
            }
            let parsed = parse_move_token(body);
            if parsed.is_none() {
                debug!("skipping unrecognised solution token '{}'", token);
            }
            parsed
        })
        .collect()
}

/// Parse a single SAN token such as `"Rf8#"`, `"exd5+"`, `"O-O"` or `"e8=Q"`.
pub fn parse_move_token(token: &str) -> Option<SolutionMove> {
    let check = if token.contains('#') {
        CheckMark::Mate
    } else if token.contains('+') {
        CheckMark::Check
    } else {
        CheckMark::None
    };

    let clean: String = token
        .chars()
        .filter(|c| !matches!(c, '+' | '#' | '!' | '?'))
        .collect();

    if matches!(clean.as_str(), "O-O" | "0-0" | "O-O-O" | "0-0-0") {
        return Some(SolutionMove {
            san: token.to_string(),
            piece: PieceKind::King,
            target: None,
            check,
        });
    }

    let first = clean.chars().next()?;
    let piece = match first {
        'a'..='h' => PieceKind::Pawn,
        letter => PieceKind::from_san_letter(letter)?,
    };

    // Promotion suffix is not part of the destination
    let movement = clean.split('=').next().unwrap_or("");
    let target = last_square(movement)?;

    Some(SolutionMove {
        san: token.to_string(),
        piece,
        target: Some(target),
        check,
    })
}

/// `"12."` → `""`, `"3...Qh4#"` → `"Qh4#"`, `"Kb6"` → `"Kb6"`.
fn strip_move_number(token: &str) -> &str {
    let rest = token.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() == token.len() || !rest.starts_with('.') {
        return token;
    }
    rest.trim_start_matches('.')
}

fn last_square(text: &str) -> Option<Square> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .windows(2)
        .rev()
        .find_map(|pair| Square::parse(&pair.iter().collect::<String>()))
}
