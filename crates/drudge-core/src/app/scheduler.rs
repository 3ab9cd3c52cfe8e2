//! Scheduler - ターン進行とタスクのライフサイクル駆動
//!
//! 1 アクター・1 ターンごとに、アクティブなタスクへライフサイクル呼び出しを行います。
//!
//! # フロー（1 ステップ）
//! 1. 未開始なら `start`
//! 2. `do_turn` → `Transition`
//! 3. `Continue` かつ effort 切れ → `finish`（後続タスクがあれば差し替え）
//! 4. `Suspend(route)` → タスクをバックログ先頭へ退避し、`Travel` を割り当て
//! 5. `Done` → その場で破棄
//!
//! moves が尽きるか、進捗のないステップが出たらターン終了です。

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::activities::Travel;
use crate::domain::{Actor, EndReason, EngineConfig, NpcMission, TaskEnd, Transition};
use crate::ports::World;
use crate::typed::{Task, TaskContext};

/// Result of driving one actor for several turns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub turns: u64,
    pub ends: Vec<TaskEnd>,

    /// The actor ran out of work before the turn limit.
    pub idle: bool,
}

pub struct Scheduler {
    config: EngineConfig,
    rng: StdRng,
    turn: u64,
}

impl Scheduler {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
            turn: 0,
        }
    }

    /// Deterministic variant for tests and replays.
    pub fn with_seed(config: EngineConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            turn: 0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// Give `actor` a new task.
    ///
    /// A resumable current task is parked in the backlog; anything else is
    /// canceled. A backlog entry that can stand in for `task` replaces it.
    pub fn assign(&mut self, actor: &mut Actor, world: &mut dyn World, task: Task) {
        let mut ctx = TaskContext::new(world, &self.config, &mut self.rng, self.turn);

        if let Some(mut current) = actor.activity.take() {
            if current.is_resumable() {
                debug!(actor = %actor.name, kind = current.kind(), "parking current task");
                actor.backlog.push_front(current);
            } else {
                current.canceled(actor, &mut ctx);
                info!(actor = %actor.name, kind = current.kind(), "task superseded");
            }
        }

        let task = match take_resumable(actor, &task) {
            Some(mut resumed) => {
                info!(actor = %actor.name, kind = resumed.kind(), "resuming backlog task");
                resumed.mark_resumed();
                resumed
            }
            None => task,
        };

        if actor.is_npc() && actor.mission != NpcMission::Activity {
            actor.set_mission(NpcMission::Activity);
        }
        actor.activity = Some(task);
    }

    /// Interrupt the active task. Returns what was canceled.
    pub fn cancel(&mut self, actor: &mut Actor, world: &mut dyn World) -> Option<TaskEnd> {
        let mut task = actor.activity.take()?;
        let mut ctx = TaskContext::new(world, &self.config, &mut self.rng, self.turn);
        task.canceled(actor, &mut ctx);
        info!(actor = %actor.name, kind = task.kind(), "task canceled");
        Some(TaskEnd::new(task.kind(), EndReason::Canceled))
    }

    /// Advance `actor` by one turn.
    pub fn process_turn(&mut self, actor: &mut Actor, world: &mut dyn World) -> Vec<TaskEnd> {
        self.turn += 1;
        actor.refill_moves();

        let mut ends = Vec::new();
        for _ in 0..self.config.max_steps_per_turn {
            let Some(mut task) = actor.activity.take() else {
                break;
            };
            let mut ctx = TaskContext::new(&mut *world, &self.config, &mut self.rng, self.turn);

            if !task.is_started() {
                task.start(actor, &mut ctx);
            }

            let moves_before = actor.moves;
            let progressed_before = (task.effort().remaining, actor.pos);
            match task.do_turn(actor, &mut ctx) {
                Transition::Continue if task.effort().is_exhausted() => {
                    let reason = if task.is_aborted() {
                        EndReason::Aborted
                    } else {
                        EndReason::Finished
                    };
                    let follow_up = task.finish(actor, &mut ctx);
                    info!(actor = %actor.name, kind = task.kind(), ?reason, "task ended");
                    ends.push(TaskEnd::new(task.kind(), reason));
                    if let Some(next) = follow_up {
                        debug!(actor = %actor.name, kind = next.kind(), "follow-up task");
                        actor.activity = Some(next);
                    }
                }
                Transition::Continue => {
                    let stalled = actor.moves == moves_before
                        && (task.effort().remaining, actor.pos) == progressed_before;
                    actor.activity = Some(task);
                    if actor.moves <= 0 || stalled {
                        break;
                    }
                }
                Transition::Done => {
                    let reason = if task.is_aborted() {
                        EndReason::Aborted
                    } else {
                        EndReason::Finished
                    };
                    debug!(actor = %actor.name, kind = task.kind(), "task nulled itself");
                    ends.push(TaskEnd::new(task.kind(), reason));
                }
                Transition::Suspend(route) => {
                    debug!(
                        actor = %actor.name,
                        kind = task.kind(),
                        steps = route.len(),
                        "task waits for travel"
                    );
                    let kind = task.kind();
                    actor.backlog.push_front(task);
                    actor.activity = Some(Task::new(Travel::new(route, Some(kind))));
                }
            }
        }

        if actor.activity.is_none() && actor.is_npc() && actor.mission == NpcMission::Activity {
            actor.revert_after_activity();
        }
        ends
    }

    /// Run turns until the actor has nothing left to do or `max_turns` pass.
    pub fn run_until_idle(&mut self, actor: &mut Actor, world: &mut dyn World, max_turns: u64) -> RunReport {
        let mut report = RunReport::default();
        while report.turns < max_turns {
            if !actor.has_activity() {
                report.idle = true;
                break;
            }
            report.ends.extend(self.process_turn(actor, world));
            report.turns += 1;
        }
        if !actor.has_activity() {
            report.idle = true;
        } else {
            warn!(actor = %actor.name, turns = report.turns, "turn limit reached with work left");
        }
        report
    }
}

/// Remove the first backlog entry able to stand in for `requested`.
fn take_resumable(actor: &mut Actor, requested: &Task) -> Option<Task> {
    if !requested.is_resumable() {
        return None;
    }
    let index = actor
        .backlog
        .iter()
        .position(|parked| parked.can_resume_with(requested, actor))?;
    actor.backlog.remove(index)
}
