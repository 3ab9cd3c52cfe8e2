//! TaskContext - ライフサイクル呼び出しに渡す明示的なコンテキスト

use rand::RngCore;

use crate::domain::EngineConfig;
use crate::ports::World;

/// Everything a lifecycle call may touch besides its own actor.
pub struct TaskContext<'a> {
    pub world: &'a mut dyn World,
    pub config: &'a EngineConfig,
    pub rng: &'a mut dyn RngCore,

    /// Simulation turn counter.
    pub turn: u64,
}

impl<'a> TaskContext<'a> {
    pub fn new(
        world: &'a mut dyn World,
        config: &'a EngineConfig,
        rng: &'a mut dyn RngCore,
        turn: u64,
    ) -> Self {
        Self {
            world,
            config,
            rng,
            turn,
        }
    }
}
