//! Opening a gate with a winch or lever (`ACT_OPEN_GATE`).

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::{Actor, Effort, ProgressMessage, Tripoint};
use crate::typed::{Activity, Task, TaskContext};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenGate {
    moves: i64,
    placement: Tripoint,
}

impl OpenGate {
    pub fn new(moves: i64, placement: Tripoint) -> Self {
        Self { moves, placement }
    }

    pub fn placement(&self) -> Tripoint {
        self.placement
    }
}

/// `t_gate_metal_c` -> `t_gate_metal_o`; anything else is not a closed gate.
fn opened(terrain: &str) -> Option<String> {
    terrain.strip_suffix("_c").map(|stem| format!("{stem}_o"))
}

impl Activity for OpenGate {
    const KIND: &'static str = "ACT_OPEN_GATE";

    fn start(&mut self, effort: &mut Effort, _actor: &mut Actor, _ctx: &mut TaskContext<'_>) {
        effort.set_budget(self.moves);
    }

    fn finish(&mut self, actor: &mut Actor, ctx: &mut TaskContext<'_>) -> Option<Task> {
        match opened(ctx.world.terrain(self.placement)) {
            Some(open) => {
                info!(actor = %actor.name, at = %self.placement, terrain = %open, "gate opened");
                ctx.world.set_terrain(self.placement, &open);
            }
            None => debug!(at = %self.placement, "nothing to open"),
        }
        None
    }

    fn progress_message(&self, effort: &Effort) -> ProgressMessage {
        match effort.percent_done() {
            Some(pct) => ProgressMessage::ExtraInfo(format!("{pct}%")),
            None => ProgressMessage::NotImplemented,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EngineConfig;
    use crate::impls::GridWorld;
    use crate::ports::MapAccess;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::rstest;

    #[rstest]
    #[case("t_gate_metal_c", Some("t_gate_metal_o"))]
    #[case("t_palisade_gate_c", Some("t_palisade_gate_o"))]
    #[case("t_gate_metal_o", None)]
    #[case("t_dirt", None)]
    fn opened_terrain(#[case] before: &str, #[case] after: Option<&str>) {
        assert_eq!(opened(before).as_deref(), after);
    }

    #[test]
    fn finish_opens_the_gate() {
        let gate = Tripoint::new(1, 1, 0);
        let mut world = GridWorld::new(4, 4);
        world.set_terrain(gate, "t_gate_metal_c");
        let config = EngineConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut ctx = TaskContext::new(&mut world, &config, &mut rng, 0);
        let mut actor = Actor::avatar("You", Tripoint::default());

        let mut task = OpenGate::new(1500, gate);
        let mut effort = Effort::default();
        task.start(&mut effort, &mut actor, &mut ctx);
        assert_eq!(effort.remaining, 1500);
        task.finish(&mut actor, &mut ctx);

        assert_eq!(world.terrain(gate), "t_gate_metal_o");
    }
}
