//! Folds session results into the lifetime statistics.
//!
//! Every transition into a terminal status counts once. Undo can bring a
//! finished session back to `InProgress`, after which its next result is
//! counted too.

use super::types::{PuzzleStats, SolveTimer};
use crate::session::Status;
use chrono::{DateTime, Utc};
use log::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct ResultTracker {
    session: Option<Uuid>,
    finished: bool,
    timer: SolveTimer,
}

impl ResultTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timer(&self) -> &SolveTimer {
        &self.timer
    }

    /// Start tracking a fresh session from now.
    pub fn begin(&mut self, session: Uuid) {
        self.begin_at(session, Utc::now());
    }

    pub fn begin_at(&mut self, session: Uuid, at: DateTime<Utc>) {
        self.session = Some(session);
        self.finished = false;
        self.timer.start_at(at);
    }

    /// Look at the session's status after a command. Returns the solve time
    /// when a result was added to `stats`.
    pub fn observe(
        &mut self,
        session: Uuid,
        status: Status,
        stats: &mut PuzzleStats,
    ) -> Option<u64> {
        self.observe_at(session, status, stats, Utc::now())
    }

    pub fn observe_at(
        &mut self,
        session: Uuid,
        status: Status,
        stats: &mut PuzzleStats,
        now: DateTime<Utc>,
    ) -> Option<u64> {
        if self.session != Some(session) {
            self.begin_at(session, now);
        }

        if status.is_in_progress() {
            if self.finished {
                debug!("session {}: back in progress, timer resumed", session);
                self.finished = false;
                self.timer.resume();
            }
            return None;
        }
        if self.finished {
            return None;
        }

        self.finished = true;
        self.timer.stop_at(now);
        let elapsed = self.timer.elapsed_secs_at(now);
        stats.record(status, elapsed);
        Some(elapsed)
    }
}
