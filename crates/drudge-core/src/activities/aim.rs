//! Aiming a wielded ranged weapon (`ACT_AIM`).
//!
//! Aiming runs until the shot is taken or aborted; it has no fixed budget.
//! Reload-and-shoot weapons (bows) are loaded on the first aiming turn and
//! unloaded again if the shot never happens.

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::domain::{Actor, Effort, ProgressMessage, Transition, Tripoint};
use crate::ports::MessageKind;
use crate::typed::{Activity, Task, TaskContext};

/// Moves spent nocking an arrow before the first aiming turn.
pub const RAS_RELOAD_COST: i32 = 50;

/// Moves spent taking the arrow off again.
pub const RAS_UNLOAD_COST: i32 = 25;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Aim {
    target: Option<Tripoint>,
    aim_turns_left: u32,
    first_turn: bool,
    aborted: bool,
    initial_view_offset: Tripoint,
}

impl Default for Aim {
    fn default() -> Self {
        Self {
            target: None,
            aim_turns_left: 0,
            first_turn: true,
            aborted: false,
            initial_view_offset: Tripoint::default(),
        }
    }
}

impl Aim {
    /// Aim at `target` for `aim_turns` turns, then fire.
    pub fn new(actor: &Actor, target: Tripoint, aim_turns: u32) -> Self {
        Self {
            target: Some(target),
            aim_turns_left: aim_turns,
            initial_view_offset: actor.view_offset,
            ..Self::default()
        }
    }

    /// Aim at `target` for the configured number of turns.
    pub fn at(actor: &Actor, target: Tripoint) -> Self {
        Self::new(actor, target, 0)
    }

    pub fn target(&self) -> Option<Tripoint> {
        self.target
    }

    pub fn is_first_turn(&self) -> bool {
        self.first_turn
    }

    fn abort(&mut self, effort: &mut Effort) -> Transition {
        self.aborted = true;
        effort.exhaust();
        Transition::Continue
    }

    fn restore_view(&self, actor: &mut Actor) {
        actor.view_offset = self.initial_view_offset;
    }

    /// Loads one round into an empty reload-and-shoot weapon.
    fn load_ras_weapon(actor: &mut Actor) -> bool {
        let Some(weapon) = actor.weapon.as_mut() else {
            return false;
        };
        if !weapon.load_one() {
            return false;
        }
        actor.moves -= RAS_RELOAD_COST;
        true
    }

    fn unload_ras_weapon(&self, actor: &mut Actor) {
        let moves_before_unload = actor.moves;
        let Some(weapon) = actor.weapon.as_mut().filter(|w| w.reload_and_shoot) else {
            return;
        };
        weapon.unload();
        actor.moves -= RAS_UNLOAD_COST;
        // Nothing was done yet, so the time is given back.
        if self.first_turn {
            actor.moves = moves_before_unload;
        }
    }
}

impl Activity for Aim {
    const KIND: &'static str = "ACT_AIM";

    fn start(&mut self, effort: &mut Effort, _actor: &mut Actor, ctx: &mut TaskContext<'_>) {
        effort.set_indefinite();
        if self.aim_turns_left == 0 {
            self.aim_turns_left = ctx.config.aim_turns.max(1);
        }
    }

    fn do_turn(
        &mut self,
        effort: &mut Effort,
        actor: &mut Actor,
        _ctx: &mut TaskContext<'_>,
    ) -> Transition {
        if !actor.is_avatar() {
            error!(actor = %actor.name, "ACT_AIM not implemented for NPCs");
            return self.abort(effort);
        }
        let Some(weapon) = actor.weapon.as_ref() else {
            return self.abort(effort);
        };
        if !weapon.can_fire() {
            return self.abort(effort);
        }
        if self.first_turn && weapon.reload_and_shoot && weapon.loaded == 0 && !Self::load_ras_weapon(actor) {
            return self.abort(effort);
        }
        let Some(target) = self.target else {
            return self.abort(effort);
        };

        actor.view_offset = target - actor.pos;
        self.aim_turns_left = self.aim_turns_left.saturating_sub(1);
        if self.aim_turns_left == 0 {
            effort.exhaust();
        } else {
            actor.moves = 0;
        }
        self.first_turn = false;
        debug!(actor = %actor.name, %target, turns_left = self.aim_turns_left, "aiming");
        Transition::Continue
    }

    fn finish(&mut self, actor: &mut Actor, ctx: &mut TaskContext<'_>) -> Option<Task> {
        self.restore_view(actor);
        if actor.weapon.is_none() {
            return None;
        }
        if self.aborted {
            self.unload_ras_weapon(actor);
            return None;
        }

        let name = actor.name.clone();
        if let (Some(weapon), Some(target)) = (actor.weapon.as_mut(), self.target) {
            weapon.loaded = weapon.loaded.saturating_sub(1);
            ctx.world.add_msg(
                MessageKind::Info,
                format!("{name} fires the {} at {target}.", weapon.name),
            );
        }
        None
    }

    fn canceled(&mut self, actor: &mut Actor, _ctx: &mut TaskContext<'_>) {
        self.restore_view(actor);
        self.unload_ras_weapon(actor);
    }

    fn progress_message(&self, _effort: &Effort) -> ProgressMessage {
        ProgressMessage::Empty
    }

    fn is_aborted(&self) -> bool {
        self.aborted
    }
}
