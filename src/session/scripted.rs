//! Scripted rules engine for exercising the session core without a chess board.
//!
//! Positions are named nodes in a small graph; each edge is a legal move in
//! coordinate form (`"a1a2"`). Flags on a node mark it as check, mate or
//! stalemate for the side to move there.

use crate::rules::{PromotionPiece, RulesEngine, RulesError, Side, Square};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScriptedMove {
    pub from: Square,
    pub to: Square,
    pub target: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flag {
    Quiet,
    Check,
    Mate,
    Stalemate,
}

#[derive(Debug)]
struct Node {
    side: Side,
    flag: Flag,
    edges: Vec<ScriptedMove>,
}

#[derive(Debug, Default)]
pub(crate) struct ScriptedRules {
    nodes: HashMap<&'static str, Node>,
}

impl ScriptedRules {
    pub fn new() -> Self {
        Self::default()
    }

    fn add(mut self, name: &'static str, side: Side, flag: Flag) -> Self {
        self.nodes.insert(
            name,
            Node {
                side,
                flag,
                edges: Vec::new(),
            },
        );
        self
    }

    pub fn position(self, name: &'static str, side: Side) -> Self {
        self.add(name, side, Flag::Quiet)
    }

    pub fn check(self, name: &'static str, side: Side) -> Self {
        self.add(name, side, Flag::Check)
    }

    pub fn checkmate(self, name: &'static str, side: Side) -> Self {
        self.add(name, side, Flag::Mate)
    }

    pub fn stalemate(self, name: &'static str, side: Side) -> Self {
        self.add(name, side, Flag::Stalemate)
    }

    /// Legal move `uci` from node `from` leading to node `to`.
    pub fn edge(mut self, from: &'static str, uci: &str, to: &'static str) -> Self {
        let (a, b) = uci.split_at(2);
        let mv = ScriptedMove {
            from: Square::parse(a).unwrap(),
            to: Square::parse(b).unwrap(),
            target: to,
        };
        self.nodes.get_mut(from).unwrap().edges.push(mv);
        self
    }

    fn node(&self, position: &&'static str) -> &Node {
        &self.nodes[position]
    }
}

impl RulesEngine for ScriptedRules {
    type Position = &'static str;
    type Move = ScriptedMove;

    fn parse_position(&self, fen: &str) -> Result<Self::Position, RulesError> {
        self.nodes
            .keys()
            .find(|name| **name == fen)
            .copied()
            .ok_or_else(|| RulesError::InvalidFen {
                fen: fen.to_string(),
                reason: "unknown node".to_string(),
            })
    }

    fn legal_moves(&self, position: &Self::Position, restrict_to: Option<Side>) -> Vec<Self::Move> {
        let node = self.node(position);
        match restrict_to {
            Some(side) if side != node.side => Vec::new(),
            _ => node.edges.clone(),
        }
    }

    fn resolve_move(
        &self,
        position: &Self::Position,
        from: Square,
        to: Square,
        _promotion: Option<PromotionPiece>,
    ) -> Result<Self::Move, RulesError> {
        self.node(position)
            .edges
            .iter()
            .find(|m| m.from == from && m.to == to)
            .copied()
            .ok_or(RulesError::IllegalMove { from, to })
    }

    fn apply_move(
        &self,
        position: &Self::Position,
        mv: &Self::Move,
    ) -> Result<Self::Position, RulesError> {
        if self.node(position).edges.contains(mv) {
            Ok(mv.target)
        } else {
            Err(RulesError::IllegalMove {
                from: mv.from,
                to: mv.to,
            })
        }
    }

    fn side_to_move(&self, position: &Self::Position) -> Side {
        self.node(position).side
    }

    fn is_check(&self, position: &Self::Position) -> bool {
        matches!(self.node(position).flag, Flag::Check | Flag::Mate)
    }

    fn is_checkmate(&self, position: &Self::Position) -> bool {
        self.node(position).flag == Flag::Mate
    }

    fn is_stalemate(&self, position: &Self::Position) -> bool {
        self.node(position).flag == Flag::Stalemate
    }

    fn is_draw(&self, position: &Self::Position) -> bool {
        self.is_stalemate(position)
    }

    fn describe_move(&self, _position: &Self::Position, mv: &Self::Move) -> String {
        format!("{}{}", mv.from, mv.to)
    }
}

/// White to play a mate in two from `start`. Black always has one reply.
///
/// ```text
/// start (W) a1a2 -> p1 (B) h8g8 -> p2 (W) a2a3 -> p3 (B) g8h8 -> p4 (W) a3a4 -> p5 (B)
///                                        h1h7 -> mate3 (B, mate)
///                                        b2b3 -> p3x (B) g8g1 -> white_mated (W, mate)
///           h1h8 -> mate1 (B, mate)
///           b1b2 -> stale (B, stalemate)
///           c1c2 -> stuck (B, no moves, not mate)
///           d1d2 -> check1 (B, check) h8g8 -> p2
/// ```
pub(crate) fn fixture() -> ScriptedRules {
    ScriptedRules::new()
        .position("start", Side::White)
        .position("p1", Side::Black)
        .position("p2", Side::White)
        .position("p3", Side::Black)
        .position("p3x", Side::Black)
        .position("p4", Side::White)
        .position("p5", Side::Black)
        .position("stuck", Side::Black)
        .check("check1", Side::Black)
        .checkmate("mate1", Side::Black)
        .checkmate("mate3", Side::Black)
        .checkmate("white_mated", Side::White)
        .stalemate("stale", Side::Black)
        .edge("start", "a1a2", "p1")
        .edge("start", "h1h8", "mate1")
        .edge("start", "b1b2", "stale")
        .edge("start", "c1c2", "stuck")
        .edge("start", "d1d2", "check1")
        .edge("p1", "h8g8", "p2")
        .edge("check1", "h8g8", "p2")
        .edge("p2", "a2a3", "p3")
        .edge("p2", "h1h7", "mate3")
        .edge("p2", "b2b3", "p3x")
        .edge("p3", "g8h8", "p4")
        .edge("p3x", "g8g1", "white_mated")
        .edge("p4", "a3a4", "p5")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_moves() {
        let rules = fixture();
        let start = rules.parse_position("start").unwrap();
        assert_eq!(rules.legal_moves(&start, Some(Side::White)).len(), 5);
        assert!(rules.legal_moves(&start, Some(Side::Black)).is_empty());

        let mv = rules
            .resolve_move(&start, Square::parse("a1").unwrap(), Square::parse("a2").unwrap(), None)
            .unwrap();
        assert_eq!(rules.apply_move(&start, &mv).unwrap(), "p1");
        assert_eq!(rules.describe_move(&start, &mv), "a1a2");
    }

    #[test]
    fn test_fixture_flags() {
        let rules = fixture();
        assert!(rules.is_checkmate(&"mate1"));
        assert!(rules.is_check(&"mate1"));
        assert!(rules.is_draw(&"stale"));
        assert!(!rules.is_checkmate(&"stuck"));
        assert!(rules.parse_position("nowhere").is_err());
    }
}
