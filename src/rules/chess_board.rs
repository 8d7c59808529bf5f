//! `RulesEngine` implementation backed by the `chess-engine` crate.
//!
//! Coordinates: chess-engine `Position::new(rank, file)` where
//!   rank 0-7 = ranks 1-8 (bottom to top)
//!   file 0-7 = files a-h (left to right)

use super::{PieceKind, PromotionPiece, RulesEngine, RulesError, Side, Square};
use chess_engine::{Board, BoardBuilder, Color, Evaluate, GameResult, Move, Piece, Position};
use log::debug;

/// A position wrapping a chess-engine board.
#[derive(Debug, Clone)]
pub struct ChessPosition {
    board: Board,
}

impl ChessPosition {
    pub fn from_board(board: Board) -> Self {
        Self { board }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn piece_at(&self, square: Square) -> Option<(Side, PieceKind)> {
        self.board.get_piece(to_engine_pos(square)).map(classify)
    }

    /// FEN piece-placement field.
    pub fn placement(&self) -> String {
        let mut out = String::with_capacity(72);
        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                match self.piece_at(Square { file, rank }) {
                    Some((side, kind)) => {
                        if empty > 0 {
                            out.push(char::from(b'0' + empty));
                            empty = 0;
                        }
                        out.push(fen_letter(side, kind));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push(char::from(b'0' + empty));
            }
            if rank > 0 {
                out.push('/');
            }
        }
        out
    }

    /// Placement plus active color. Castling and move counters are not
    /// tracked by the underlying board and are omitted.
    pub fn to_fen(&self) -> String {
        let side = from_engine_color(self.board.get_turn_color());
        format!("{} {}", self.placement(), side.fen_char())
    }

    fn pieces(&self) -> impl Iterator<Item = (Side, PieceKind)> + '_ {
        (0..64u8).filter_map(move |i| self.piece_at(Square { file: i % 8, rank: i / 8 }))
    }
}

impl PartialEq for ChessPosition {
    fn eq(&self, other: &Self) -> bool {
        self.board.get_turn_color() == other.board.get_turn_color()
            && self.placement() == other.placement()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MoveKind {
    Piece,
    KingSideCastle,
    QueenSideCastle,
}

/// A legal move in a [`ChessPosition`]. Resignation is not a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChessMove {
    kind: MoveKind,
    from: Square,
    to: Square,
}

impl ChessMove {
    /// Wrap an engine move played by `mover`; `None` for `Move::Resign`.
    /// Castling is recorded as the king's path.
    pub fn from_engine(mv: Move, mover: Side) -> Option<Self> {
        let back_rank = match mover {
            Side::White => 0,
            Side::Black => 7,
        };
        let (kind, from_file, to_file) = match mv {
            Move::Piece(from, to) => {
                return Some(Self {
                    kind: MoveKind::Piece,
                    from: from_engine_pos(from),
                    to: from_engine_pos(to),
                })
            }
            Move::KingSideCastle => (MoveKind::KingSideCastle, 4, 6),
            Move::QueenSideCastle => (MoveKind::QueenSideCastle, 4, 2),
            Move::Resign => return None,
        };
        Some(Self {
            kind,
            from: Square { file: from_file, rank: back_rank },
            to: Square { file: to_file, rank: back_rank },
        })
    }

    pub fn from(&self) -> Square {
        self.from
    }

    pub fn to(&self) -> Square {
        self.to
    }

    pub fn engine_move(&self) -> Move {
        match self.kind {
            MoveKind::Piece => Move::Piece(to_engine_pos(self.from), to_engine_pos(self.to)),
            MoveKind::KingSideCastle => Move::KingSideCastle,
            MoveKind::QueenSideCastle => Move::QueenSideCastle,
        }
    }
}

/// Rules engine over `chess_engine::Board`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChessEngineRules;

impl ChessEngineRules {
    pub fn new() -> Self {
        Self
    }

    /// Build a board from a FEN string. En-passant and move counters are
    /// ignored; castling rights are honored.
    pub fn board_from_fen(fen: &str) -> Result<Board, RulesError> {
        let invalid = |reason: String| RulesError::InvalidFen {
            fen: fen.to_string(),
            reason,
        };

        let mut fields = fen.split_whitespace();
        let placement = fields
            .next()
            .ok_or_else(|| invalid("empty string".to_string()))?;
        let active = fields.next().unwrap_or("w");
        let castling = fields.next().unwrap_or("-");

        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(invalid(format!("expected 8 ranks, found {}", ranks.len())));
        }

        let mut builder = BoardBuilder::default();
        let mut white_kings = 0;
        let mut black_kings = 0;

        for (i, rank_text) in ranks.iter().enumerate() {
            let rank = 7 - i as i32;
            let mut file = 0i32;
            for c in rank_text.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as i32;
                    continue;
                }
                if file > 7 {
                    return Err(invalid(format!("rank {} overflows", rank + 1)));
                }
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                let pos = Position::new(rank, file);
                let piece = match c.to_ascii_lowercase() {
                    'k' => {
                        match color {
                            Color::White => white_kings += 1,
                            Color::Black => black_kings += 1,
                        }
                        Piece::King(color, pos)
                    }
                    'q' => Piece::Queen(color, pos),
                    'r' => Piece::Rook(color, pos),
                    'b' => Piece::Bishop(color, pos),
                    'n' => Piece::Knight(color, pos),
                    'p' => Piece::Pawn(color, pos),
                    other => return Err(invalid(format!("unknown piece '{}'", other))),
                };
                builder = builder.piece(piece);
                file += 1;
            }
            if file != 8 {
                return Err(invalid(format!("rank {} has {} files", rank + 1, file)));
            }
        }

        if white_kings != 1 || black_kings != 1 {
            return Err(invalid("each side needs exactly one king".to_string()));
        }

        for c in castling.chars() {
            builder = match c {
                'K' => builder.enable_kingside_castle(Color::White),
                'Q' => builder.enable_queenside_castle(Color::White),
                'k' => builder.enable_kingside_castle(Color::Black),
                'q' => builder.enable_queenside_castle(Color::Black),
                '-' => builder,
                other => return Err(invalid(format!("bad castling flag '{}'", other))),
            };
        }

        let turn = match active {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(invalid(format!("bad active color '{}'", other))),
        };

        let board = builder.build();
        Ok(if board.get_turn_color() == turn {
            board
        } else {
            board.change_turn()
        })
    }

    fn has_insufficient_material(position: &ChessPosition) -> bool {
        let mut minors = 0;
        for (_, kind) in position.pieces() {
            match kind {
                PieceKind::King => {}
                PieceKind::Bishop | PieceKind::Knight => minors += 1,
                _ => return false,
            }
        }
        minors <= 1
    }
}

impl RulesEngine for ChessEngineRules {
    type Position = ChessPosition;
    type Move = ChessMove;

    fn parse_position(&self, fen: &str) -> Result<ChessPosition, RulesError> {
        Self::board_from_fen(fen).map(ChessPosition::from_board)
    }

    fn legal_moves(&self, position: &ChessPosition, restrict_to: Option<Side>) -> Vec<ChessMove> {
        let board = &position.board;
        let turn = from_engine_color(board.get_turn_color());
        board
            .get_legal_moves()
            .into_iter()
            .filter_map(|m| {
                let mover = match m {
                    Move::Piece(from, _) => classify(board.get_piece(from)?).0,
                    Move::KingSideCastle | Move::QueenSideCastle => turn,
                    Move::Resign => return None,
                };
                if restrict_to.is_some_and(|wanted| wanted != mover) {
                    return None;
                }
                ChessMove::from_engine(m, mover)
            })
            .collect()
    }

    fn resolve_move(
        &self,
        position: &ChessPosition,
        from: Square,
        to: Square,
        promotion: Option<PromotionPiece>,
    ) -> Result<ChessMove, RulesError> {
        let board = &position.board;
        let from_pos = to_engine_pos(from);
        let to_pos = to_engine_pos(to);

        // King moving two files is a castle
        let candidate = match board.get_piece(from_pos) {
            Some(piece) if piece.is_king() && from.rank == to.rank => {
                if to.file == from.file + 2 {
                    Move::KingSideCastle
                } else if from.file >= 2 && to.file == from.file - 2 {
                    Move::QueenSideCastle
                } else {
                    Move::Piece(from_pos, to_pos)
                }
            }
            Some(_) => Move::Piece(from_pos, to_pos),
            None => return Err(RulesError::IllegalMove { from, to }),
        };

        if let Some(choice) = promotion {
            if choice != PromotionPiece::Queen {
                debug!("promotion to {:?} requested; board always promotes to a queen", choice);
            }
        }

        match board.play_move(candidate) {
            GameResult::IllegalMove(_) => Err(RulesError::IllegalMove { from, to }),
            _ => {
                let mover = from_engine_color(board.get_turn_color());
                ChessMove::from_engine(candidate, mover)
                    .ok_or(RulesError::IllegalMove { from, to })
            }
        }
    }

    fn apply_move(
        &self,
        position: &ChessPosition,
        mv: &ChessMove,
    ) -> Result<ChessPosition, RulesError> {
        let board = &position.board;
        if let GameResult::IllegalMove(_) = board.play_move(mv.engine_move()) {
            return Err(RulesError::IllegalMove {
                from: mv.from(),
                to: mv.to(),
            });
        }
        // play_move discards the board on mate/stalemate; apply_eval_move keeps it
        Ok(ChessPosition::from_board(board.apply_eval_move(mv.engine_move())))
    }

    fn side_to_move(&self, position: &ChessPosition) -> Side {
        from_engine_color(position.board.get_turn_color())
    }

    fn is_check(&self, position: &ChessPosition) -> bool {
        let board = &position.board;
        board.is_in_check(board.get_turn_color())
    }

    fn is_checkmate(&self, position: &ChessPosition) -> bool {
        position.board.is_checkmate()
    }

    fn is_stalemate(&self, position: &ChessPosition) -> bool {
        position.board.is_stalemate()
    }

    fn is_draw(&self, position: &ChessPosition) -> bool {
        self.is_stalemate(position) || Self::has_insufficient_material(position)
    }

    fn describe_move(&self, position: &ChessPosition, mv: &ChessMove) -> String {
        let mut text = match mv.kind {
            MoveKind::Piece => {
                let is_capture = position.piece_at(mv.to).is_some();
                let kind = position.piece_at(mv.from).map(|(_, kind)| kind);
                match kind.and_then(PieceKind::san_letter) {
                    Some(letter) => {
                        let capture = if is_capture { "x" } else { "" };
                        format!("{}{}{}", letter, capture, mv.to)
                    }
                    None if is_capture => {
                        let from_file = (b'a' + mv.from.file) as char;
                        format!("{}x{}", from_file, mv.to)
                    }
                    None => mv.to.to_string(),
                }
            }
            MoveKind::KingSideCastle => "O-O".to_string(),
            MoveKind::QueenSideCastle => "O-O-O".to_string(),
        };

        if let Ok(after) = self.apply_move(position, mv) {
            if self.is_checkmate(&after) {
                text.push('#');
            } else if self.is_check(&after) {
                text.push('+');
            }
        }
        text
    }
}

fn to_engine_pos(square: Square) -> Position {
    Position::new(square.rank as i32, square.file as i32)
}

fn from_engine_pos(pos: Position) -> Square {
    Square {
        file: pos.get_col() as u8,
        rank: pos.get_row() as u8,
    }
}

fn from_engine_color(color: Color) -> Side {
    match color {
        Color::White => Side::White,
        Color::Black => Side::Black,
    }
}

fn classify(piece: Piece) -> (Side, PieceKind) {
    match piece {
        Piece::King(c, _) => (from_engine_color(c), PieceKind::King),
        Piece::Queen(c, _) => (from_engine_color(c), PieceKind::Queen),
        Piece::Rook(c, _) => (from_engine_color(c), PieceKind::Rook),
        Piece::Bishop(c, _) => (from_engine_color(c), PieceKind::Bishop),
        Piece::Knight(c, _) => (from_engine_color(c), PieceKind::Knight),
        Piece::Pawn(c, _) => (from_engine_color(c), PieceKind::Pawn),
    }
}

/// FEN piece letter: uppercase for White, lowercase for Black.
pub fn fen_letter(side: Side, kind: PieceKind) -> char {
    let letter = kind.san_letter().unwrap_or('P');
    match side {
        Side::White => letter,
        Side::Black => letter.to_ascii_lowercase(),
    }
}
