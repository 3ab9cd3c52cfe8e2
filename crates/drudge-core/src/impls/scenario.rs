//! Scenario - JSON で記述したワールドとアクターの初期状態
//!
//! デモ・CLI・統合テスト用です。タスクは保存形式
//! （`{"actor_type", "actor_data"}`）で記述し、`TaskRegistry` で復元します。

use serde::Deserialize;
use serde_json::Value;

use super::grid_world::{CargoPart, GridWorld};
use crate::domain::{Actor, ActorKind, CodecError, Item, Tripoint, Volume, Weapon};
use crate::ports::{CargoRef, MapAccess, Zone};
use crate::typed::{Task, TaskRegistry, decode_task};

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("scenario is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("scenario task could not be decoded: {0}")]
    Task(#[from] CodecError),

    #[error("{what} at {at} lies outside the {width}x{height} map")]
    OutOfBounds {
        what: &'static str,
        at: Tripoint,
        width: i32,
        height: i32,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemSpec {
    pub name: String,
    pub volume_ml: u32,
    #[serde(default)]
    pub category: String,
    #[serde(default = "one")]
    pub count: u32,
    #[serde(default)]
    pub liquid: bool,
    #[serde(default)]
    pub favorite: bool,
}

fn one() -> u32 {
    1
}

fn one_copy() -> usize {
    1
}

impl ItemSpec {
    fn to_item(&self) -> Item {
        let mut item = Item::new(self.name.as_str(), Volume::ml(self.volume_ml))
            .with_category(self.category.as_str())
            .with_count(self.count);
        item.liquid = self.liquid;
        item.favorite = self.favorite;
        item
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlacedItems {
    pub at: Tripoint,
    pub item: ItemSpec,
    #[serde(default = "one_copy")]
    pub copies: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TerrainSpec {
    pub at: Tripoint,
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CargoSpec {
    pub part: u32,
    pub at: Tripoint,
    pub capacity_ml: u32,
    #[serde(default)]
    pub broken: bool,
    #[serde(default)]
    pub items: Vec<ItemSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VehicleSpec {
    pub id: u32,
    pub parts: Vec<CargoSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActorSpec {
    pub name: String,
    #[serde(default = "avatar")]
    pub kind: ActorKind,
    pub at: Tripoint,
    #[serde(default)]
    pub speed: Option<i32>,
    #[serde(default)]
    pub weapon: Option<Weapon>,
    #[serde(default)]
    pub skill_computer: i32,
    #[serde(default)]
    pub intelligence: Option<i32>,
}

fn avatar() -> ActorKind {
    ActorKind::Avatar
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub walls: Vec<Tripoint>,
    #[serde(default)]
    pub fires: Vec<Tripoint>,
    #[serde(default)]
    pub terrain: Vec<TerrainSpec>,
    #[serde(default)]
    pub zones: Vec<Zone>,
    #[serde(default)]
    pub items: Vec<PlacedItems>,
    #[serde(default)]
    pub vehicles: Vec<VehicleSpec>,
    pub actor: ActorSpec,

    /// Task to hand the actor, in saved form.
    #[serde(default)]
    pub task: Value,
}

/// A scenario turned into live objects.
#[derive(Debug)]
pub struct Loaded {
    pub world: GridWorld,
    pub actor: Actor,
    pub task: Option<Task>,
}

impl Scenario {
    pub fn from_json(text: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(text)?)
    }

    fn check(&self, world: &GridWorld, what: &'static str, at: Tripoint) -> Result<(), ScenarioError> {
        if world.in_bounds(at) {
            return Ok(());
        }
        Err(ScenarioError::OutOfBounds {
            what,
            at,
            width: self.width,
            height: self.height,
        })
    }

    pub fn load(&self, registry: &TaskRegistry) -> Result<Loaded, ScenarioError> {
        let mut world = GridWorld::new(self.width, self.height);

        for &p in &self.walls {
            self.check(&world, "wall", p)?;
            world.set_wall(p);
        }
        for &p in &self.fires {
            self.check(&world, "fire", p)?;
            world.set_fire(p);
        }
        for spec in &self.terrain {
            self.check(&world, "terrain", spec.at)?;
            world.set_terrain(spec.at, &spec.id);
        }
        for placed in &self.items {
            self.check(&world, "item", placed.at)?;
            world.add_ground_items(placed.at, &placed.item.to_item(), placed.copies);
        }
        for vehicle in &self.vehicles {
            for spec in &vehicle.parts {
                self.check(&world, "cargo part", spec.at)?;
                world.add_cargo_part(
                    CargoRef {
                        vehicle: vehicle.id,
                        part: spec.part,
                    },
                    CargoPart {
                        pos: spec.at,
                        capacity: Volume::ml(spec.capacity_ml),
                        broken: spec.broken,
                        items: spec.items.iter().map(ItemSpec::to_item).collect(),
                    },
                );
            }
        }
        for zone in &self.zones {
            world.add_zone(zone.clone());
        }

        self.check(&world, "actor", self.actor.at)?;
        let mut actor = Actor::new(self.actor.name.as_str(), self.actor.kind, self.actor.at);
        if let Some(speed) = self.actor.speed {
            actor.speed = speed;
        }
        if let Some(intelligence) = self.actor.intelligence {
            actor.intelligence = intelligence;
        }
        actor.weapon = self.actor.weapon.clone();
        actor.skill_computer = self.actor.skill_computer;

        let task = decode_task(registry, &self.task)?;
        Ok(Loaded { world, actor, task })
    }
}
