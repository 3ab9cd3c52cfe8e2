//! Walking a precomputed route.
//!
//! This is the movement sub-task a suspended task waits behind. The
//! suspended task sits in the actor's backlog; on arrival `finish` takes
//! it back out so the scheduler can re-activate it.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{Actor, Effort, ProgressMessage, Route, Tripoint, Transition};
use crate::typed::{Activity, Task, TaskContext};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Travel {
    path: VecDeque<Tripoint>,

    /// Kind of the backlog task to re-activate on arrival.
    #[serde(default)]
    resume: Option<String>,

    #[serde(default)]
    aborted: bool,
}

impl Travel {
    pub fn new(route: Route, resume: Option<&str>) -> Self {
        Self {
            path: route.path,
            resume: resume.map(str::to_string),
            aborted: false,
        }
    }

    pub fn remaining(&self) -> usize {
        self.path.len()
    }

    pub fn resume_kind(&self) -> Option<&str> {
        self.resume.as_deref()
    }
}

impl Activity for Travel {
    const KIND: &'static str = "ACT_TRAVEL";

    fn start(&mut self, effort: &mut Effort, _actor: &mut Actor, _ctx: &mut TaskContext<'_>) {
        effort.set_indefinite();
    }

    fn do_turn(
        &mut self,
        effort: &mut Effort,
        actor: &mut Actor,
        ctx: &mut TaskContext<'_>,
    ) -> Transition {
        while actor.moves > 0 {
            let Some(&next) = self.path.front() else {
                break;
            };
            if !ctx.world.passable(next) {
                warn!(actor = %actor.name, at = %next, "route blocked");
                self.aborted = true;
                effort.exhaust();
                return Transition::Continue;
            }
            actor.pos = next;
            self.path.pop_front();
            actor.moves -= ctx.config.travel_move_cost;
        }
        if self.path.is_empty() {
            debug!(actor = %actor.name, at = %actor.pos, "arrived");
            effort.exhaust();
        }
        Transition::Continue
    }

    fn finish(&mut self, actor: &mut Actor, _ctx: &mut TaskContext<'_>) -> Option<Task> {
        if self.aborted {
            // The waiting task stays in the backlog until it is requested again.
            return None;
        }
        let kind = self.resume.as_deref()?;
        let mut task = actor.take_backlog(kind)?;
        task.mark_resumed();
        Some(task)
    }

    fn progress_message(&self, _effort: &Effort) -> ProgressMessage {
        ProgressMessage::Full(format!("{} steps to go", self.path.len()))
    }

    fn is_aborted(&self) -> bool {
        self.aborted
    }
}
