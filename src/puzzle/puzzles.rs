//! Built-in puzzle set, used when no puzzle file or server is configured.

use super::repository::PuzzleEntry;

/// A single built-in puzzle definition (static data).
struct PuzzleDef {
    /// Short display title (e.g., "Back Rank Mate")
    title: &'static str,
    fen: &'static str,
    /// Solution in the same free-text form puzzle files use
    solution: &'static str,
    difficulty: &'static str,
    tags: &'static [&'static str],
}

static BUILTIN_PUZZLES: &[PuzzleDef] = &[
    // Rook sweeps the eighth rank; the pawns box the king in
    PuzzleDef {
        title: "Back Rank Mate",
        fen: "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1",
        solution: "1. Ra8#",
        difficulty: "mate_in_1",
        tags: &["back-rank", "rook"],
    },
    // 1. f3 e5 2. g4?? and Black to play
    PuzzleDef {
        title: "Fool's Mate",
        fen: "rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq g3 0 2",
        solution: "2... Qh4#",
        difficulty: "mate_in_1",
        tags: &["opening", "queen"],
    },
    // 1. e4 e5 2. Bc4 Nc6 3. Qh5 Nf6??
    PuzzleDef {
        title: "Scholar's Mate",
        fen: "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4",
        solution: "4. Qxf7#",
        difficulty: "mate_in_1",
        tags: &["opening", "queen"],
    },
    // King takes the opposition; Black's only move walks into the rook
    PuzzleDef {
        title: "Opposition",
        fen: "k7/8/2K5/8/8/8/8/7R w - - 0 1",
        solution: "1. Kb6 Kb8 2. Rh8#",
        difficulty: "mate_in_2",
        tags: &["endgame", "rook"],
    },
    // Two rooks: one cuts the seventh rank, the other mates on the eighth
    PuzzleDef {
        title: "Rook Roller",
        fen: "7k/8/8/8/8/8/R7/1R4K1 w - - 0 1",
        solution: "1. Ra7 Kg8 2. Rb8#",
        difficulty: "mate_in_2",
        tags: &["endgame", "rook"],
    },
];

/// Built-in puzzles as repository entries, ids 1..=N in table order.
pub fn builtin_entries() -> Vec<PuzzleEntry> {
    BUILTIN_PUZZLES
        .iter()
        .enumerate()
        .map(|(i, def)| PuzzleEntry {
            id: Some(i as u64 + 1),
            fen: def.fen.to_string(),
            solution: def.solution.to_string(),
            difficulty: def.difficulty.to_string(),
            tags: def.tags.iter().map(|t| t.to_string()).collect(),
            title: Some(def.title.to_string()),
        })
        .collect()
}
