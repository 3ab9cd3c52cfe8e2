//! Hacking a card reader or electronic safe (`ACT_HACKING`).
//!
//! # Roll
//! `hack_level = computer skill + intelligence / 2 - 8`, rolled as
//! `ceil(normal(hack_level, 5))`:
//! - `< 0`: short circuit, alarm (and at `<= -5` the tool or power is lost)
//! - `< 6`: nothing happens
//! - otherwise: success

use rand::RngCore;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::domain::{Actor, Effort, ProgressMessage, Tripoint};
use crate::ports::MessageKind;
use crate::typed::{Activity, Task, TaskContext};

/// Five minutes of game time.
pub const HACKING_MOVES: i64 = 30_000;

const HACK_STDDEV: f64 = 5.0;
const DOOR_UNLOCK_RADIUS: i32 = 3;

const CARD_READER: &str = "t_card_reader";
const CARD_READER_BROKEN: &str = "t_card_reader_broken";
const DOOR_LOCKED: &str = "t_door_metal_locked";
const DOOR_CLOSED: &str = "t_door_metal_c";
const SAFE_LOCKED: &str = "f_gunsafe_el";
const SAFE_OPEN: &str = "f_safe_o";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HackResult {
    Fail,
    Nothing,
    Success,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HackTarget {
    Door,
    Safe,
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hacking {
    using_bionic: bool,
    target: Tripoint,
}

impl Hacking {
    pub fn with_electrohack(target: Tripoint) -> Self {
        Self {
            using_bionic: false,
            target,
        }
    }

    pub fn with_bionic(target: Tripoint) -> Self {
        Self {
            using_bionic: true,
            target,
        }
    }

    pub fn using_bionic(&self) -> bool {
        self.using_bionic
    }

    pub fn target(&self) -> Tripoint {
        self.target
    }
}

pub fn hack_level(actor: &Actor) -> i32 {
    actor.skill_computer + actor.intelligence / 2 - 8
}

/// Sample from `normal(mean, stddev)`; a non-finite or negative `stddev`
/// yields `mean`.
fn normal_roll(rng: &mut dyn RngCore, mean: f64, stddev: f64) -> f64 {
    Normal::new(mean, stddev).map_or(mean, |normal| normal.sample(rng))
}

fn classify(roll: i32) -> HackResult {
    if roll < 0 {
        HackResult::Fail
    } else if roll < 6 {
        HackResult::Nothing
    } else {
        HackResult::Success
    }
}

impl Hacking {
    fn attempt(&self, actor: &Actor, ctx: &mut TaskContext<'_>) -> HackResult {
        let roll = normal_roll(ctx.rng, f64::from(hack_level(actor)), HACK_STDDEV).ceil() as i32;
        let result = classify(roll);
        if result == HackResult::Fail {
            ctx.world
                .add_msg(MessageKind::Info, "You cause a short circuit!".to_string());
            if roll <= -5 {
                let text = if self.using_bionic {
                    "Your power is drained!"
                } else {
                    "Your electrohack is ruined!"
                };
                ctx.world.add_msg(MessageKind::Bad, text.to_string());
            }
        }
        info!(actor = %actor.name, roll, ?result, "hack attempt");
        result
    }

    fn target_kind(&self, ctx: &TaskContext<'_>) -> HackTarget {
        match ctx.world.terrain(self.target) {
            CARD_READER => HackTarget::Door,
            SAFE_LOCKED => HackTarget::Safe,
            _ => HackTarget::Other,
        }
    }

    fn unlock_doors(&self, ctx: &mut TaskContext<'_>) {
        let r = DOOR_UNLOCK_RADIUS;
        for dz in -r..=r {
            for dy in -r..=r {
                for dx in -r..=r {
                    let p = self.target + Tripoint::new(dx, dy, dz);
                    if ctx.world.terrain(p) == DOOR_LOCKED {
                        ctx.world.set_terrain(p, DOOR_CLOSED);
                    }
                }
            }
        }
    }
}

impl Activity for Hacking {
    const KIND: &'static str = "ACT_HACKING";

    fn start(&mut self, effort: &mut Effort, _actor: &mut Actor, _ctx: &mut TaskContext<'_>) {
        effort.set_budget(HACKING_MOVES);
    }

    fn finish(&mut self, actor: &mut Actor, ctx: &mut TaskContext<'_>) -> Option<Task> {
        let target = self.target_kind(ctx);
        match self.attempt(actor, ctx) {
            HackResult::Fail => {
                ctx.world
                    .add_msg(MessageKind::Sound, "an alarm sound!".to_string());
            }
            HackResult::Nothing => {
                ctx.world.add_msg(
                    MessageKind::Info,
                    "You fail the hack, but no alarms are triggered.".to_string(),
                );
            }
            HackResult::Success => match target {
                HackTarget::Safe => {
                    ctx.world.add_msg(
                        MessageKind::Good,
                        "The door on the safe swings open.".to_string(),
                    );
                    ctx.world.set_terrain(self.target, SAFE_OPEN);
                }
                HackTarget::Door => {
                    ctx.world
                        .add_msg(MessageKind::Info, "You activate the panel!".to_string());
                    ctx.world
                        .add_msg(MessageKind::Good, "The nearby doors unlock.".to_string());
                    ctx.world.set_terrain(self.target, CARD_READER_BROKEN);
                    self.unlock_doors(ctx);
                }
                HackTarget::Other => {}
            },
        }
        None
    }

    fn progress_message(&self, effort: &Effort) -> ProgressMessage {
        match effort.percent_done() {
            Some(pct) => ProgressMessage::ExtraInfo(format!("{pct}%")),
            None => ProgressMessage::NotImplemented,
        }
    }

    /// Old saves store `null`; those hacks were done with an electrohack.
    fn decode(data: Value) -> Result<Self, serde_json::Error> {
        if data.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(data)
    }
}
