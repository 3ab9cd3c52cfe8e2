//! Digging a pit, channel or grave (`ACT_DIG`).

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{Actor, Effort, Item, ProgressMessage, Transition, Tripoint, Volume};
use crate::ports::MessageKind;
use crate::typed::{Activity, Task, TaskContext};

const GRAVE: &str = "t_grave";
const BONES: &str = "bone_human";

/// Shovel noise is made once per this many turns.
const SOUND_INTERVAL: u64 = 60;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dig {
    /// Total budget in moves.
    moves: i64,
    location: Tripoint,
    result_terrain: String,
    byproducts_location: Tripoint,
    byproducts_count: u32,
    byproducts_item_group: String,
}

impl Dig {
    pub fn new(location: Tripoint, moves: i64, result_terrain: impl Into<String>) -> Self {
        Self {
            moves,
            location,
            result_terrain: result_terrain.into(),
            byproducts_location: location,
            ..Self::default()
        }
    }

    /// Leave `count` items of `group` at `location` when done (dug-out dirt and the like).
    pub fn with_byproducts(mut self, location: Tripoint, count: u32, group: impl Into<String>) -> Self {
        self.byproducts_location = location;
        self.byproducts_count = count;
        self.byproducts_item_group = group.into();
        self
    }

    pub fn location(&self) -> Tripoint {
        self.location
    }

    fn exhume(&self, ctx: &mut TaskContext<'_>) {
        if ctx.rng.gen_range(0..10) == 0 {
            ctx.world.add_msg(
                MessageKind::Warning,
                "Something crawls out of the coffin!".to_string(),
            );
            return;
        }
        let count = ctx.rng.gen_range(5..=15);
        ctx.world.spawn_item(
            self.location,
            Item::new(BONES, Volume::ml(250)).with_count(count),
        );
    }
}

impl Activity for Dig {
    const KIND: &'static str = "ACT_DIG";
    const RESUMABLE: bool = true;

    fn start(&mut self, effort: &mut Effort, _actor: &mut Actor, _ctx: &mut TaskContext<'_>) {
        // A resumed dig keeps the progress it already made.
        if effort.is_exhausted() {
            effort.set_budget(self.moves);
        }
    }

    fn do_turn(
        &mut self,
        _effort: &mut Effort,
        _actor: &mut Actor,
        ctx: &mut TaskContext<'_>,
    ) -> Transition {
        if ctx.turn % SOUND_INTERVAL == 0 {
            ctx.world.add_msg(MessageKind::Sound, "hsh!".to_string());
        }
        Transition::Continue
    }

    fn finish(&mut self, actor: &mut Actor, ctx: &mut TaskContext<'_>) -> Option<Task> {
        let grave = ctx.world.terrain(self.location) == GRAVE;
        if grave {
            self.exhume(ctx);
        }

        ctx.world.set_terrain(self.location, &self.result_terrain);
        if !self.byproducts_item_group.is_empty() {
            for _ in 0..self.byproducts_count {
                ctx.world.spawn_item(
                    self.byproducts_location,
                    Item::new(self.byproducts_item_group.as_str(), Volume::liters(1)),
                );
            }
        }
        info!(actor = %actor.name, at = %self.location, terrain = %self.result_terrain, "dig finished");

        if actor.is_avatar() {
            let text = if grave {
                "You finish exhuming a grave.".to_string()
            } else {
                format!("You finish digging the {}.", ctx.world.terrain(self.location))
            };
            ctx.world.add_msg(MessageKind::Good, text);
        }
        None
    }

    fn can_resume_with(&self, other: &Self, _actor: &Actor) -> bool {
        self.location == other.location && self.result_terrain == other.result_terrain
    }

    fn progress_message(&self, effort: &Effort) -> ProgressMessage {
        match effort.percent_done() {
            Some(pct) => ProgressMessage::ExtraInfo(format!("{pct}%")),
            None => ProgressMessage::NotImplemented,
        }
    }
}
