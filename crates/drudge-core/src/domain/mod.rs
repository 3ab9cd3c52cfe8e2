//! Domain model (points, ids, items, actors, effort, outcomes, errors).

pub mod actor;
pub mod config;
pub mod effort;
pub mod errors;
pub mod ids;
pub mod item;
pub mod outcome;
pub mod point;

pub use actor::{Actor, ActorKind, NpcMission, Weapon};
pub use config::EngineConfig;
pub use effort::{Effort, INDEFINITELY_LONG};
pub use errors::{CodecError, RegistryError};
pub use ids::{ActorId, ItemId};
pub use item::{Item, Volume};
pub use outcome::{EndReason, ProgressMessage, Route, TaskEnd, Transition};
pub use point::{Tripoint, direction_name, direction_suffix, sort_by_distance};
