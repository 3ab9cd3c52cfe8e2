//! Effort budget carried by every task.

use serde::{Deserialize, Serialize};

/// Sentinel budget for open-ended tasks.
///
/// A task with this budget only ends when it exhausts itself explicitly.
pub const INDEFINITELY_LONG: i64 = i64::MAX / 2;

/// Remaining / total effort of a task, in moves.
///
/// State transitions:
/// - fresh -> budgeted (`set_budget`) or indefinite (`set_indefinite`)
/// - budgeted -> consumed turn by turn -> exhausted
/// - indefinite -> exhausted only via `exhaust`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effort {
    pub remaining: i64,
    pub total: i64,
}

impl Effort {
    pub fn set_budget(&mut self, moves: i64) {
        self.remaining = moves.max(0);
        self.total = moves.max(0);
    }

    pub fn set_indefinite(&mut self) {
        self.remaining = INDEFINITELY_LONG;
        self.total = INDEFINITELY_LONG;
    }

    pub fn is_indefinite(&self) -> bool {
        self.remaining >= INDEFINITELY_LONG
    }

    /// Signal completion (or abort) to the scheduler.
    pub fn exhaust(&mut self) {
        self.remaining = 0;
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining <= 0
    }

    /// Consume up to `available` moves from a budgeted task; returns what was spent.
    ///
    /// Indefinite tasks are never charged here.
    pub fn consume(&mut self, available: i64) -> i64 {
        if self.is_indefinite() || available <= 0 {
            return 0;
        }
        let spent = available.min(self.remaining);
        self.remaining -= spent;
        spent
    }

    /// Percentage done for budgeted tasks, `None` for indefinite ones.
    pub fn percent_done(&self) -> Option<u8> {
        if self.is_indefinite() || self.total <= 0 {
            return None;
        }
        let done = (self.total - self.remaining.max(0)) * 100 / self.total;
        Some(done.clamp(0, 100) as u8)
    }
}
