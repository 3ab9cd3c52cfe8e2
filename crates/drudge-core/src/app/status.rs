//! Status - アクターのタスク状況
//!
//! 進捗表示やログ出力用のスナップショットです。

use serde::{Deserialize, Serialize};

use crate::domain::{Actor, ProgressMessage, Tripoint};
use crate::typed::Task;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatus {
    pub kind: String,

    /// `None` for open-ended tasks.
    pub percent_done: Option<u8>,

    /// Rendered progress line, if the task has anything to show.
    pub progress: Option<String>,
}

impl TaskStatus {
    pub fn of(task: &Task) -> Self {
        let percent_done = task.effort().percent_done();
        let progress = match task.progress_message() {
            ProgressMessage::Full(text) => Some(text),
            ProgressMessage::ExtraInfo(extra) => Some(match percent_done {
                Some(pct) if !extra.ends_with('%') => format!("{pct}% {extra}"),
                _ => extra,
            }),
            ProgressMessage::NotImplemented => percent_done.map(|pct| format!("{pct}%")),
            ProgressMessage::Empty => None,
        };
        Self {
            kind: task.kind().to_string(),
            percent_done,
            progress,
        }
    }
}

/// ActorStatus はアクターの現在のタスクとバックログを説明
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorStatus {
    pub name: String,
    pub pos: Tripoint,
    pub moves: i32,
    pub activity: Option<TaskStatus>,
    pub backlog: Vec<String>,
}

impl ActorStatus {
    pub fn of(actor: &Actor) -> Self {
        Self {
            name: actor.name.clone(),
            pos: actor.pos,
            moves: actor.moves,
            activity: actor.activity.as_ref().map(TaskStatus::of),
            backlog: actor.backlog.iter().map(|t| t.kind().to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activities::{Dig, MoveLoot, Travel};
    use crate::typed::task::Activity;
    use crate::domain::Route;

    #[test]
    fn idle_actor() {
        let status = ActorStatus::of(&Actor::avatar("You", Tripoint::new(1, 2, 0)));
        assert!(status.activity.is_none());
        assert!(status.backlog.is_empty());
    }

    #[test]
    fn travelling_actor_shows_route_and_waiting_task() {
        let mut actor = Actor::avatar("You", Tripoint::default());
        actor.activity = Some(Task::new(Travel::new(
            Route::new([Tripoint::new(1, 0, 0), Tripoint::new(2, 0, 0)]),
            Some(MoveLoot::KIND),
        )));
        actor.backlog.push_back(Task::new(MoveLoot::new()));

        let status = ActorStatus::of(&actor);
        let activity = status.activity.expect("activity");
        assert_eq!(activity.kind, "ACT_TRAVEL");
        assert_eq!(activity.progress.as_deref(), Some("2 steps to go"));
        assert_eq!(status.backlog, vec!["ACT_MOVE_LOOT"]);
    }

    #[test]
    fn fresh_budgeted_task_has_no_percentage_yet() {
        let mut actor = Actor::avatar("You", Tripoint::default());
        actor.activity = Some(Task::new(Dig::new(Tripoint::default(), 100, "t_pit")));
        let activity = ActorStatus::of(&actor).activity.expect("activity");
        assert_eq!(activity.percent_done, None);
        assert_eq!(activity.progress, None);
    }
}
