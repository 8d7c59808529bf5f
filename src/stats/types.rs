//! Solve statistics and the per-puzzle timer.

use crate::session::Status;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifetime puzzle statistics (persisted).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PuzzleStats {
    pub puzzles_solved: u32,
    pub puzzles_attempted: u32,
    pub puzzles_failed: u32,
    pub puzzles_abandoned: u32,
    pub puzzles_drawn: u32,
    /// Fastest solve, in seconds
    pub best_time_secs: Option<u64>,
    pub total_solve_secs: u64,
    /// Unix timestamp of the last recorded result
    pub last_played: Option<i64>,
}

impl PuzzleStats {
    /// Fold one finished session into the totals. `InProgress` is ignored.
    pub fn record(&mut self, status: Status, elapsed_secs: u64) {
        match status {
            Status::InProgress => return,
            Status::Solved => {
                self.puzzles_solved += 1;
                self.total_solve_secs += elapsed_secs;
                self.best_time_secs = Some(
                    self.best_time_secs
                        .map_or(elapsed_secs, |best| best.min(elapsed_secs)),
                );
            }
            Status::Failed(_) => self.puzzles_failed += 1,
            Status::Drawn => self.puzzles_drawn += 1,
            Status::Aborted => self.puzzles_abandoned += 1,
        }
        self.puzzles_attempted += 1;
        self.last_played = Some(Utc::now().timestamp());
    }

    /// Solved / attempted as a percentage, 0 when nothing was attempted.
    pub fn success_rate(&self) -> f64 {
        if self.puzzles_attempted == 0 {
            return 0.0;
        }
        self.puzzles_solved as f64 / self.puzzles_attempted as f64 * 100.0
    }

    pub fn average_solve_secs(&self) -> Option<u64> {
        (self.puzzles_solved > 0).then(|| self.total_solve_secs / self.puzzles_solved as u64)
    }

    /// Multi-line summary for the `stats` command.
    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!("Solved:   {}", self.puzzles_solved),
            format!("Attempts: {}", self.puzzles_attempted),
            format!("Success:  {:.1}%", self.success_rate()),
        ];
        if let Some(best) = self.best_time_secs {
            lines.push(format!("Best:     {}", format_clock(best)));
        }
        if let Some(avg) = self.average_solve_secs() {
            lines.push(format!("Average:  {}", format_clock(avg)));
        }
        lines.join("\n")
    }
}

/// Wall-clock timer for the current attempt.
#[derive(Debug, Clone, Default)]
pub struct SolveTimer {
    started: Option<DateTime<Utc>>,
    stopped: Option<DateTime<Utc>>,
}

impl SolveTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) timing from now.
    pub fn start(&mut self) {
        self.start_at(Utc::now());
    }

    pub fn start_at(&mut self, at: DateTime<Utc>) {
        self.started = Some(at);
        self.stopped = None;
    }

    /// Freeze the elapsed time. No effect when not running.
    pub fn stop(&mut self) {
        self.stop_at(Utc::now());
    }

    pub fn stop_at(&mut self, at: DateTime<Utc>) {
        if self.is_running() {
            self.stopped = Some(at);
        }
    }

    /// Keep counting from the original start after a `stop`.
    pub fn resume(&mut self) {
        if self.started.is_some() {
            self.stopped = None;
        }
    }

    pub fn reset(&mut self) {
        self.started = None;
        self.stopped = None;
    }

    pub fn is_running(&self) -> bool {
        self.started.is_some() && self.stopped.is_none()
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs_at(Utc::now())
    }

    pub fn elapsed_secs_at(&self, now: DateTime<Utc>) -> u64 {
        let Some(started) = self.started else {
            return 0;
        };
        let end = self.stopped.unwrap_or(now);
        (end - started).num_seconds().max(0) as u64
    }
}

/// `m:ss` clock text.
pub fn format_clock(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
