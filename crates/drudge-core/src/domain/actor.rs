//! Acting entities: the avatar and NPCs.
//!
//! An actor owns at most one active task plus a backlog of suspended ones.
//! Tasks are moved in and out of these slots, never shared.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::ids::ActorId;
use super::point::Tripoint;
use crate::typed::Task;

pub const DEFAULT_FACTION: &str = "your_followers";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    Avatar,
    Npc,
}

/// What an NPC is doing when it is not busy with a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NpcMission {
    #[default]
    Idle,
    Follow,
    Guard,
    /// Working through an assigned task.
    Activity,
}

/// A wielded ranged weapon, reduced to what aiming needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,

    /// Bows and similar weapons: loaded right before the shot, unloaded
    /// again when the shot does not happen.
    #[serde(default)]
    pub reload_and_shoot: bool,

    #[serde(default)]
    pub loaded: u32,

    /// Ammunition carried for it.
    #[serde(default)]
    pub reserve: u32,
}

impl Weapon {
    pub fn new(name: impl Into<String>, loaded: u32, reserve: u32) -> Self {
        Self {
            name: name.into(),
            reload_and_shoot: false,
            loaded,
            reserve,
        }
    }

    pub fn reload_and_shoot(mut self) -> Self {
        self.reload_and_shoot = true;
        self
    }

    pub fn can_fire(&self) -> bool {
        self.loaded > 0 || (self.reload_and_shoot && self.reserve > 0)
    }

    /// Load one round from the reserve. Returns false when there is none.
    pub fn load_one(&mut self) -> bool {
        if self.reserve == 0 {
            return false;
        }
        self.reserve -= 1;
        self.loaded += 1;
        true
    }

    pub fn unload(&mut self) {
        self.reserve += self.loaded;
        self.loaded = 0;
    }
}

#[derive(Debug, Clone)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    pub kind: ActorKind,
    pub pos: Tripoint,

    /// Moves left this turn; may go negative after an expensive action.
    pub moves: i32,

    /// Moves gained per turn.
    pub speed: i32,

    pub activity: Option<Task>,
    pub backlog: VecDeque<Task>,

    /// Camera offset relative to `pos`.
    pub view_offset: Tripoint,

    pub weapon: Option<Weapon>,
    pub faction: String,

    pub mission: NpcMission,
    pub previous_mission: Option<NpcMission>,

    pub skill_computer: i32,
    pub intelligence: i32,
}

impl Actor {
    pub fn new(name: impl Into<String>, kind: ActorKind, pos: Tripoint) -> Self {
        Self {
            id: ActorId::generate(),
            name: name.into(),
            kind,
            pos,
            moves: 0,
            speed: 100,
            activity: None,
            backlog: VecDeque::new(),
            view_offset: Tripoint::default(),
            weapon: None,
            faction: DEFAULT_FACTION.to_string(),
            mission: NpcMission::default(),
            previous_mission: None,
            skill_computer: 0,
            intelligence: 8,
        }
    }

    pub fn avatar(name: impl Into<String>, pos: Tripoint) -> Self {
        Self::new(name, ActorKind::Avatar, pos)
    }

    pub fn npc(name: impl Into<String>, pos: Tripoint) -> Self {
        Self::new(name, ActorKind::Npc, pos)
    }

    pub fn is_avatar(&self) -> bool {
        self.kind == ActorKind::Avatar
    }

    pub fn is_npc(&self) -> bool {
        self.kind == ActorKind::Npc
    }

    /// Start-of-turn refill. A debt from the previous turn carries over.
    pub fn refill_moves(&mut self) {
        self.moves = self.moves.min(0) + self.speed;
    }

    pub fn set_mission(&mut self, mission: NpcMission) {
        self.previous_mission = Some(self.mission);
        self.mission = mission;
    }

    /// Drop back to whatever the NPC was doing before it was put to work.
    pub fn revert_after_activity(&mut self) {
        self.mission = self.previous_mission.take().unwrap_or_default();
    }

    /// Remove and return the first backlog entry of the given kind.
    pub fn take_backlog(&mut self, kind: &str) -> Option<Task> {
        let index = self.backlog.iter().position(|t| t.kind() == kind)?;
        self.backlog.remove(index)
    }

    pub fn has_activity(&self) -> bool {
        self.activity.is_some()
    }
}
