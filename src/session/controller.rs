//! Session controller: the command surface for one puzzle at a time.
//!
//! Player commands and the automated reply all funnel through here, so the
//! session is only ever mutated by one caller. The driver supplies time by
//! calling [`SessionController::tick`] at a fixed interval.

use super::error::SessionError;
use super::outcome::{describe_position, evaluate};
use super::scheduler::{pick_random, Countdown, ReplyTicket, TurnScheduler};
use super::types::{Mode, PuzzleOrder, Session, Status};
use crate::constants::DEFAULT_THINK_TICKS;
use crate::puzzle::{Hint, PuzzleRecord, PuzzleRepository, RepositoryError, SolutionMove};
use crate::rules::{PromotionPiece, RulesEngine, Side, Square};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Controller settings, usually built from the app config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerOptions {
    pub mode: Mode,
    /// Size constrained sessions from the puzzle's `mate_in_N` label
    pub mode_from_puzzle: bool,
    pub think_ticks: u32,
    pub order: PuzzleOrder,
    /// Fixed seed for the automated opponent; entropy when `None`
    pub seed: Option<u64>,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            mode: Mode::mate_in(2),
            mode_from_puzzle: true,
            think_ticks: DEFAULT_THINK_TICKS,
            order: PuzzleOrder::Random,
            seed: None,
        }
    }
}

/// A move that was applied, by either side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveReport {
    pub mover: Side,
    pub notation: String,
    /// Ply count after the move
    pub ply: u32,
    pub status: Status,
    /// Automated reply scheduled in response, if any
    pub reply: Option<ReplyTicket>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoReport {
    pub plies_removed: u32,
    pub ply: u32,
    pub reply: Option<ReplyTicket>,
}

/// What one tick of the driver loop produced.
#[derive(Debug)]
pub enum TickOutcome {
    Idle,
    Thinking { ticks_remaining: u32 },
    Replied(MoveReport),
    NoReply(SessionError),
}

pub struct SessionController<E: RulesEngine, R: PuzzleRepository> {
    engine: E,
    repository: R,
    scheduler: TurnScheduler,
    rng: StdRng,
    mode: Mode,
    mode_from_puzzle: bool,
    order: PuzzleOrder,
    puzzle: Option<PuzzleRecord>,
    session: Option<Session<E::Position>>,
}

impl<E: RulesEngine, R: PuzzleRepository> SessionController<E, R> {
    pub fn new(engine: E, repository: R, options: ControllerOptions) -> Self {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            engine,
            repository,
            scheduler: TurnScheduler::new(options.think_ticks),
            rng,
            mode: options.mode,
            mode_from_puzzle: options.mode_from_puzzle,
            order: options.order,
            puzzle: None,
            session: None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn scheduler(&self) -> &TurnScheduler {
        &self.scheduler
    }

    pub fn session(&self) -> Option<&Session<E::Position>> {
        self.session.as_ref()
    }

    pub fn puzzle(&self) -> Option<&PuzzleRecord> {
        self.puzzle.as_ref()
    }

    /// Mode of the live session, or the mode the next one will start in.
    pub fn mode(&self) -> Mode {
        self.session.as_ref().map_or(self.mode, |s| s.mode())
    }

    pub fn order(&self) -> PuzzleOrder {
        self.order
    }

    pub fn status(&self) -> Option<Status> {
        self.session.as_ref().map(|s| s.status())
    }

    pub fn ply_count(&self) -> u32 {
        self.session.as_ref().map_or(0, |s| s.ply_count())
    }

    pub fn current_position(&self) -> Option<&E::Position> {
        self.session.as_ref().map(|s| s.current_position())
    }

    pub fn history_len(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.history().len())
    }

    pub fn is_thinking(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_thinking())
    }

    pub fn pending_ticket(&self) -> Option<ReplyTicket> {
        self.session.as_ref().and_then(|s| s.pending()).map(|p| p.ticket)
    }

    /// Check, mate or draw text for the current position.
    pub fn position_summary(&self) -> Option<String> {
        self.current_position()
            .and_then(|p| describe_position(&self.engine, p))
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Start a fresh session on `record`. A record whose position does not
    /// parse is rejected and the current session is left as it was.
    pub fn load_puzzle(&mut self, record: PuzzleRecord) -> Result<(), SessionError> {
        let initial = self
            .engine
            .parse_position(&record.fen)
            .map_err(SessionError::InvalidPosition)?;

        if let Some(old) = self.session.as_mut() {
            self.scheduler.cancel(old);
        }

        let mode = if self.mode_from_puzzle {
            Mode::for_record(&record, self.mode)
        } else {
            self.mode
        };
        let session = self.start_session(initial, mode);
        info!(
            "session {}: loaded {} ({}), {} to play",
            session.id(),
            record.label(),
            mode,
            session.player_side()
        );
        self.session = Some(session);
        self.puzzle = Some(record);
        Ok(())
    }

    pub fn load_by_index(&mut self, index: usize) -> Result<(), SessionError> {
        let record = self.repository.by_index(index)?;
        self.load_puzzle(record)
    }

    pub fn load_random(&mut self) -> Result<(), SessionError> {
        let record = self.repository.random()?;
        self.load_puzzle(record)
    }

    /// Load the next puzzle according to the configured order.
    pub fn load_new(&mut self) -> Result<(), SessionError> {
        match self.order {
            PuzzleOrder::Random => self.load_random(),
            PuzzleOrder::Sequential => {
                let count = self.repository.count()?;
                if count == 0 {
                    return Err(RepositoryError::Empty.into());
                }
                let next = self.current_index().map_or(0, |i| (i + 1) % count);
                self.load_by_index(next)
            }
        }
    }

    pub fn next(&mut self) -> Result<(), SessionError> {
        let count = self.repository.count()?;
        let next = self.current_index().map_or(0, |i| i + 1);
        if next >= count {
            return Err(SessionError::AtLastPuzzle);
        }
        self.load_by_index(next)
    }

    pub fn previous(&mut self) -> Result<(), SessionError> {
        match self.current_index() {
            Some(index) if index > 0 => self.load_by_index(index - 1),
            _ => Err(SessionError::AtFirstPuzzle),
        }
    }

    /// Restart the loaded puzzle from its starting position, same mode.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        let mode = self.mode();
        self.restart(mode)
    }

    /// Switch mode. Restarts the loaded puzzle; later loads keep this mode.
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), SessionError> {
        self.mode = mode;
        self.mode_from_puzzle = false;
        if self.puzzle.is_some() {
            self.restart(mode)?;
        }
        Ok(())
    }

    pub fn set_order(&mut self, order: PuzzleOrder) {
        self.order = order;
    }

    // =========================================================================
    // Play
    // =========================================================================

    /// Apply the player's move from `from` to `to`.
    pub fn attempt_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PromotionPiece>,
    ) -> Result<MoveReport, SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NoPuzzleLoaded)?;
        if !session.status().is_in_progress() {
            return Err(SessionError::NotYourTurn);
        }

        let mover = self.engine.side_to_move(session.current_position());
        if session.mode().is_constrained()
            && (session.is_thinking() || mover != session.player_side())
        {
            return Err(SessionError::NotYourTurn);
        }

        let mv = self
            .engine
            .resolve_move(session.current_position(), from, to, promotion)?;
        session.unblock_replies();
        apply_move(&self.engine, &self.scheduler, session, &mv, mover)
    }

    /// Step back through the history. Constrained sessions undo the
    /// player's move and the reply to it together.
    pub fn undo(&mut self) -> Result<UndoReport, SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NoPuzzleLoaded)?;
        if session.status() == Status::Aborted {
            return Err(SessionError::NotYourTurn);
        }
        let available = session.history().len() - 1;
        if available == 0 {
            return Err(SessionError::NothingToUndo);
        }

        self.scheduler.cancel(session);

        let wanted = match session.mode() {
            Mode::FreePlay => 1,
            Mode::Constrained(_) => 2,
        };
        let removed = wanted.min(available);
        let target = available - removed;
        let rewound = session.rewind_to(target);
        debug_assert!(rewound.is_ok(), "undo target {} past history end", target);
        rewound?;

        // Any terminal status other than Aborted came from the last move
        session.set_status(Status::InProgress);
        session.unblock_replies();
        let reply = self.scheduler.maybe_schedule(&self.engine, session);

        debug!(
            "session {}: undid {} plies, now at ply {}",
            session.id(),
            removed,
            session.ply_count()
        );
        Ok(UndoReport {
            plies_removed: removed as u32,
            ply: session.ply_count(),
            reply,
        })
    }

    /// Give up on the current puzzle.
    pub fn abandon(&mut self) -> Result<(), SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NoPuzzleLoaded)?;
        if !session.status().is_in_progress() {
            return Err(SessionError::NotYourTurn);
        }
        self.scheduler.cancel(session);
        session.set_status(Status::Aborted);
        info!("session {}: abandoned at ply {}", session.id(), session.ply_count());
        Ok(())
    }

    // =========================================================================
    // Automated reply
    // =========================================================================

    /// Advance the thinking countdown by one tick, firing the reply when due.
    pub fn tick(&mut self) -> TickOutcome {
        let Some(session) = self.session.as_mut() else {
            return TickOutcome::Idle;
        };
        match self.scheduler.advance(session) {
            Countdown::Idle => TickOutcome::Idle,
            Countdown::Waiting(ticks_remaining) => TickOutcome::Thinking { ticks_remaining },
            Countdown::Due(ticket) => match self.fire_reply(ticket) {
                Ok(Some(report)) => TickOutcome::Replied(report),
                Ok(None) => TickOutcome::Idle,
                Err(e) => TickOutcome::NoReply(e),
            },
        }
    }

    /// Play the automated reply for `ticket`. A stale ticket is a no-op
    /// (`Ok(None)`). Legal moves are taken from the position at fire time.
    pub fn fire_reply(&mut self, ticket: ReplyTicket) -> Result<Option<MoveReport>, SessionError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(None);
        };
        if !self.scheduler.is_current(session, ticket) {
            debug!("session {}: ignoring stale reply {:?}", session.id(), ticket);
            return Ok(None);
        }
        session.take_pending();

        let side = session.opponent_side();
        if !session.status().is_in_progress()
            || self.engine.side_to_move(session.current_position()) != side
        {
            return Ok(None);
        }

        let moves = self
            .engine
            .legal_moves(session.current_position(), Some(side));
        let Some(mv) = pick_random(&moves, &mut self.rng) else {
            session.block_replies();
            warn!(
                "session {}: {} has no legal moves but the game is not over",
                session.id(),
                side
            );
            return Err(SessionError::NoLegalMovesForAutomatedSide(side));
        };

        apply_move(&self.engine, &self.scheduler, session, &mv, side).map(Some)
    }

    // =========================================================================
    // Solutions
    // =========================================================================

    /// Piece and target of the canonical move at the current ply.
    pub fn request_hint(&self) -> Result<Hint, SessionError> {
        let session = self.session.as_ref().ok_or(SessionError::NoPuzzleLoaded)?;
        let ply = session.ply_count();
        let solution = self.solution()?;
        solution
            .get(ply as usize)
            .map(SolutionMove::hint)
            .ok_or(SessionError::NoHintAvailable { ply })
    }

    /// The full canonical solution of the loaded puzzle.
    pub fn reveal_solution(&self) -> Result<Vec<SolutionMove>, SessionError> {
        self.solution()
    }

    fn solution(&self) -> Result<Vec<SolutionMove>, SessionError> {
        let record = self.puzzle.as_ref().ok_or(SessionError::NoPuzzleLoaded)?;
        match self.repository.solution(record.id) {
            Ok(solution) => Ok(solution),
            // Records loaded directly may carry their own solution
            Err(RepositoryError::NotFound(_)) if !record.solution.is_empty() => {
                Ok(record.solution.clone())
            }
            Err(e) => Err(e.into()),
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn current_index(&self) -> Option<usize> {
        self.puzzle.as_ref().and_then(|p| p.index)
    }

    /// Replace the session with a fresh one on the loaded puzzle.
    fn restart(&mut self, mode: Mode) -> Result<(), SessionError> {
        let record = self.puzzle.as_ref().ok_or(SessionError::NoPuzzleLoaded)?;
        let initial = self
            .engine
            .parse_position(&record.fen)
            .map_err(SessionError::InvalidPosition)?;

        if let Some(old) = self.session.as_mut() {
            self.scheduler.cancel(old);
        }
        let session = self.start_session(initial, mode);
        debug!("session {}: restarted in {}", session.id(), mode);
        self.session = Some(session);
        Ok(())
    }

    fn start_session(&self, initial: E::Position, mode: Mode) -> Session<E::Position> {
        let player = self.engine.side_to_move(&initial);
        Session::new(initial, player, mode)
    }
}

/// Apply `mv` for `mover`, evaluate the outcome and schedule the reply.
fn apply_move<E: RulesEngine>(
    engine: &E,
    scheduler: &TurnScheduler,
    session: &mut Session<E::Position>,
    mv: &E::Move,
    mover: Side,
) -> Result<MoveReport, SessionError> {
    let notation = engine.describe_move(session.current_position(), mv);
    let next = engine.apply_move(session.current_position(), mv)?;
    let ply = session.record_move(next);

    let status = evaluate(engine, session, mover).status();
    session.set_status(status);

    let reply = if status.is_in_progress() {
        scheduler.maybe_schedule(engine, session)
    } else {
        None
    };

    debug!(
        "session {}: ply {} {} {} -> {}",
        session.id(),
        ply,
        mover,
        notation,
        status
    );
    if status.is_terminal() {
        info!("session {}: {} after {} plies", session.id(), status, ply);
    }

    Ok(MoveReport {
        mover,
        notation,
        ply,
        status,
        reply,
    })
}
