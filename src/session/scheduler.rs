//! Deferred automated replies.
//!
//! A reply is represented by a [`ReplyTicket`] stamped with the scheduler's
//! generation. Every schedule and every cancel advances the generation, so a
//! ticket handed out earlier can never fire once anything has superseded it.
//! The delay is counted in ticks; the driver calls `advance` once per tick.

use super::types::Session;
use crate::rules::{RulesEngine, Side};
use log::debug;
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};

/// Handle for one scheduled automated reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReplyTicket {
    generation: u64,
}

impl ReplyTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// The reply a session is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingReply {
    pub ticket: ReplyTicket,
    pub ticks_remaining: u32,
}

/// Result of advancing the countdown by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    /// Nothing scheduled
    Idle,
    /// Still thinking, with this many ticks left
    Waiting(u32),
    /// The delay has elapsed; fire this ticket
    Due(ReplyTicket),
}

#[derive(Debug)]
pub struct TurnScheduler {
    generation: AtomicU64,
    think_ticks: u32,
}

impl TurnScheduler {
    pub fn new(think_ticks: u32) -> Self {
        Self {
            generation: AtomicU64::new(0),
            think_ticks,
        }
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// The side the rules engine says is to move.
    pub fn whose_turn<E: RulesEngine>(engine: &E, position: &E::Position) -> Side {
        engine.side_to_move(position)
    }

    /// Schedule the opponent's reply when the session is constrained, in
    /// progress, under its ply limit and not blocked, and the opponent is
    /// to move. Any reply already pending is superseded.
    pub fn maybe_schedule<E: RulesEngine>(
        &self,
        engine: &E,
        session: &mut Session<E::Position>,
    ) -> Option<ReplyTicket> {
        if !session.mode().is_constrained()
            || !session.status().is_in_progress()
            || session.replies_blocked()
            || session.plies_remaining() == Some(0)
        {
            return None;
        }
        if Self::whose_turn(engine, session.current_position()) != session.opponent_side() {
            return None;
        }

        let ticket = ReplyTicket {
            generation: self.generation.fetch_add(1, Ordering::SeqCst) + 1,
        };
        let replaced = session.set_pending(PendingReply {
            ticket,
            ticks_remaining: self.think_ticks,
        });
        if let Some(old) = replaced {
            debug!("session {}: reply {:?} superseded", session.id(), old.ticket);
        }
        debug!(
            "session {}: {} reply scheduled in {} ticks",
            session.id(),
            session.opponent_side(),
            self.think_ticks
        );
        Some(ticket)
    }

    /// Drop the pending reply and invalidate every ticket issued so far.
    pub fn cancel<P>(&self, session: &mut Session<P>) -> Option<ReplyTicket> {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let cancelled = session.take_pending().map(|p| p.ticket);
        if let Some(ticket) = cancelled {
            debug!("session {}: reply {:?} cancelled", session.id(), ticket);
        }
        cancelled
    }

    /// Count one tick off the pending reply.
    pub fn advance<P>(&self, session: &mut Session<P>) -> Countdown {
        let Some(pending) = session.pending_mut() else {
            return Countdown::Idle;
        };
        if pending.ticks_remaining > 1 {
            pending.ticks_remaining -= 1;
            Countdown::Waiting(pending.ticks_remaining)
        } else {
            pending.ticks_remaining = 0;
            Countdown::Due(pending.ticket)
        }
    }

    /// Whether `ticket` is the one the session is still waiting on.
    pub fn is_current<P>(&self, session: &Session<P>, ticket: ReplyTicket) -> bool {
        ticket.generation == self.current_generation()
            && session.pending().map(|p| p.ticket) == Some(ticket)
    }
}

/// Uniformly random element of `moves`.
pub fn pick_random<M: Clone, R: Rng + ?Sized>(moves: &[M], rng: &mut R) -> Option<M> {
    if moves.is_empty() {
        return None;
    }
    let idx = rng.gen_range(0..moves.len());
    Some(moves[idx].clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::scripted::{fixture, ScriptedRules};
    use crate::session::types::Mode;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn session_at(rules: &ScriptedRules, node: &str, mode: Mode) -> Session<&'static str> {
        let position = rules.parse_position(node).unwrap();
        Session::new(position, Side::White, mode)
    }

    #[test]
    fn test_schedules_when_opponent_to_move() {
        let rules = fixture();
        let scheduler = TurnScheduler::new(3);
        let mut session = session_at(&rules, "p1", Mode::Constrained(4));

        let ticket = scheduler.maybe_schedule(&rules, &mut session).unwrap();
        assert!(session.is_thinking());
        assert!(scheduler.is_current(&session, ticket));
        assert_eq!(session.pending().unwrap().ticks_remaining, 3);
    }

    #[test]
    fn test_no_schedule_when_player_to_move_or_free_play() {
        let rules = fixture();
        let scheduler = TurnScheduler::new(3);

        let mut own_turn = session_at(&rules, "start", Mode::Constrained(4));
        assert!(scheduler.maybe_schedule(&rules, &mut own_turn).is_none());

        let mut free = session_at(&rules, "p1", Mode::FreePlay);
        assert!(scheduler.maybe_schedule(&rules, &mut free).is_none());
        assert!(!free.is_thinking());
    }

    #[test]
    fn test_reschedule_supersedes_previous_ticket() {
        let rules = fixture();
        let scheduler = TurnScheduler::new(3);
        let mut session = session_at(&rules, "p1", Mode::Constrained(4));

        let first = scheduler.maybe_schedule(&rules, &mut session).unwrap();
        let second = scheduler.maybe_schedule(&rules, &mut session).unwrap();
        assert!(second.generation() > first.generation());
        assert!(!scheduler.is_current(&session, first));
        assert!(scheduler.is_current(&session, second));
    }

    #[test]
    fn test_cancel_invalidates_ticket() {
        let rules = fixture();
        let scheduler = TurnScheduler::new(3);
        let mut session = session_at(&rules, "p1", Mode::Constrained(4));

        let ticket = scheduler.maybe_schedule(&rules, &mut session).unwrap();
        let before = scheduler.current_generation();
        assert_eq!(scheduler.cancel(&mut session), Some(ticket));
        assert!(scheduler.current_generation() > before);
        assert!(!session.is_thinking());
        assert!(!scheduler.is_current(&session, ticket));

        // Cancelling with nothing pending still bumps the generation
        let before = scheduler.current_generation();
        assert_eq!(scheduler.cancel(&mut session), None);
        assert!(scheduler.current_generation() > before);
    }

    #[test]
    fn test_advance_counts_down_to_due() {
        let rules = fixture();
        let scheduler = TurnScheduler::new(3);
        let mut session = session_at(&rules, "p1", Mode::Constrained(4));
        assert_eq!(scheduler.advance(&mut session), Countdown::Idle);

        let ticket = scheduler.maybe_schedule(&rules, &mut session).unwrap();
        assert_eq!(scheduler.advance(&mut session), Countdown::Waiting(2));
        assert_eq!(scheduler.advance(&mut session), Countdown::Waiting(1));
        assert_eq!(scheduler.advance(&mut session), Countdown::Due(ticket));
    }

    #[test]
    fn test_zero_delay_is_due_immediately() {
        let rules = fixture();
        let scheduler = TurnScheduler::new(0);
        let mut session = session_at(&rules, "p1", Mode::Constrained(4));
        let ticket = scheduler.maybe_schedule(&rules, &mut session).unwrap();
        assert_eq!(scheduler.advance(&mut session), Countdown::Due(ticket));
    }

    #[test]
    fn test_pick_random() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let empty: [u8; 0] = [];
        assert_eq!(pick_random(&empty, &mut rng), None);

        let moves = [1, 2, 3];
        for _ in 0..50 {
            let picked = pick_random(&moves, &mut rng).unwrap();
            assert!(moves.contains(&picked));
        }
    }
}
