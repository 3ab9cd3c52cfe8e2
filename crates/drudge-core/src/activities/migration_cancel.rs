//! Placeholder for tasks from saves whose kind no longer exists
//! (`ACT_MIGRATION_CANCEL`).
//!
//! Its first turn removes it and leaves the actor in a clean state.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::domain::{Actor, Effort, Transition};
use crate::typed::{Activity, Task, TaskContext};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationCancel;

impl Activity for MigrationCancel {
    const KIND: &'static str = "ACT_MIGRATION_CANCEL";

    fn start(&mut self, effort: &mut Effort, _actor: &mut Actor, _ctx: &mut TaskContext<'_>) {
        effort.set_indefinite();
    }

    fn do_turn(
        &mut self,
        _effort: &mut Effort,
        actor: &mut Actor,
        _ctx: &mut TaskContext<'_>,
    ) -> Transition {
        if actor.is_npc() {
            actor.revert_after_activity();
        } else {
            actor.backlog.clear();
        }
        debug!(actor = %actor.name, "migrated task canceled");
        Transition::Done
    }

    fn finish(&mut self, _actor: &mut Actor, _ctx: &mut TaskContext<'_>) -> Option<Task> {
        None
    }

    fn decode(_data: Value) -> Result<Self, serde_json::Error> {
        Ok(Self)
    }
}
