//! Plain-text board diagram.

use crate::rules::chess_board::fen_letter;
use crate::rules::{ChessPosition, Side, Square};

/// Render `position` from `perspective`'s side of the board. White pieces
/// are uppercase, black lowercase, empty squares `.`.
pub fn render_board(position: &ChessPosition, perspective: Side) -> String {
    let ranks: Vec<u8> = match perspective {
        Side::White => (0..8).rev().collect(),
        Side::Black => (0..8).collect(),
    };
    let files: Vec<u8> = match perspective {
        Side::White => (0..8).collect(),
        Side::Black => (0..8).rev().collect(),
    };

    let mut out = String::new();
    for &rank in &ranks {
        out.push_str(&format!("{} ", rank + 1));
        for &file in &files {
            let c = Square::new(file, rank)
                .and_then(|sq| position.piece_at(sq))
                .map_or('.', |(side, kind)| fen_letter(side, kind));
            out.push(' ');
            out.push(c);
        }
        out.push('\n');
    }
    out.push_str("  ");
    for &file in &files {
        out.push(' ');
        out.push((b'a' + file) as char);
    }
    out
}
