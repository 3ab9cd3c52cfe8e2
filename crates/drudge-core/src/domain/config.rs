//! Engine tunables.
//!
//! Every field has a default, so a config file only needs to name the
//! values it changes.

use serde::{Deserialize, Serialize};

/// Tunables shared by the scheduler and every task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Search radius (tiles) for unsorted sources and destination tiles.
    pub search_radius: i32,

    /// Re-sort pending source tiles after a relocation longer than this.
    pub resort_threshold: usize,

    /// A destination tile holding this many items is full.
    pub max_items_per_tile: usize,

    /// Moves charged for hauling one item (or stack).
    pub item_move_cost: i32,

    /// Moves charged per tile walked.
    pub travel_move_cost: i32,

    /// Turns spent aiming before the shot.
    pub aim_turns: u32,

    /// Upper bound on lifecycle calls within one turn.
    pub max_steps_per_turn: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            search_radius: 60,
            resort_threshold: 16,
            max_items_per_tile: 4096,
            item_move_cost: 100,
            travel_move_cost: 100,
            aim_turns: 1,
            max_steps_per_turn: 256,
        }
    }
}
