//! Outcome model: what a lifecycle call hands back to the scheduler.
//!
//! Tasks never raise errors to the scheduler. A turn ends in one of the
//! [`Transition`] values, and a task that leaves the actor ends with a
//! [`TaskEnd`] record that says why.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::point::Tripoint;

/// Result of one `do_turn` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Keep the task active. If its effort reached zero the scheduler
    /// calls `finish` next.
    Continue,

    /// The task nulled itself without going through `finish`.
    Done,

    /// The actor must walk first. The scheduler moves the task to the
    /// front of the backlog and installs a travel task along the route;
    /// on arrival the suspended task is re-activated and started again.
    Suspend(Route),
}

/// Ordered tiles to walk, excluding the tile the actor stands on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub path: VecDeque<Tripoint>,
}

impl Route {
    pub fn new(path: impl IntoIterator<Item = Tripoint>) -> Self {
        Self {
            path: path.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn destination(&self) -> Option<Tripoint> {
        self.path.back().copied()
    }
}

/// Why a task left its actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EndReason {
    Finished,
    Aborted,
    Canceled,
}

/// A task that is gone, as observed by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskEnd {
    pub kind: String,
    pub reason: EndReason,
}

impl TaskEnd {
    pub fn new(kind: impl Into<String>, reason: EndReason) -> Self {
        Self {
            kind: kind.into(),
            reason,
        }
    }
}

/// Text a task offers for a progress display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProgressMessage {
    /// The task has nothing to say; the caller picks a generic display.
    #[default]
    NotImplemented,
    /// Replaces the whole progress line.
    Full(String),
    /// Appended after the generic percentage.
    ExtraInfo(String),
    /// Show nothing at all.
    Empty,
}
