//! Activity trait と Task - 型付きタスクの定義
//!
//! # 二層構造
//! - **表層（Typed）**: `Activity` trait - 具体的なタスクはこれを実装する
//! - **内部（Dyn）**: `DynActivity` trait - object-safe, type erasure
//!
//! `Task` は `Box<dyn DynActivity>` に effort と開始済みフラグを添えたもので、
//! アクターが所有する単位です。`Copy` ではなく、複製は明示的な `clone` のみ。

use std::any::Any;
use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::context::TaskContext;
use crate::domain::{Actor, Effort, ProgressMessage, Transition};

/// Activity は kind 文字列と型を対応付け、ライフサイクルを実装する
///
/// # 使用例
/// ```ignore
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// struct Dig { location: Tripoint }
///
/// impl Activity for Dig {
///     const KIND: &'static str = "ACT_DIG";
///     fn start(&mut self, effort: &mut Effort, _: &mut Actor, _: &mut TaskContext<'_>) {
///         effort.set_budget(1000);
///     }
///     fn finish(&mut self, _: &mut Actor, _: &mut TaskContext<'_>) -> Option<Task> {
///         None
///     }
/// }
/// ```
///
/// # Trait Bounds
/// - `Serialize` / `DeserializeOwned`: セーブデータとの往復のため
/// - `Clone`: `Task` の明示的な複製のため
/// - `Send + 'static`: trait object として保持するため
pub trait Activity: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + 'static {
    /// 永続化で使う識別子（例: `ACT_MOVE_LOOT`）
    const KIND: &'static str;

    /// バックログから再開できるか
    const RESUMABLE: bool = false;

    /// Runs once (again after every resumption). Sets the effort budget.
    fn start(&mut self, effort: &mut Effort, actor: &mut Actor, ctx: &mut TaskContext<'_>);

    /// Runs once per scheduler step while the task is active.
    fn do_turn(
        &mut self,
        _effort: &mut Effort,
        _actor: &mut Actor,
        _ctx: &mut TaskContext<'_>,
    ) -> Transition {
        Transition::Continue
    }

    /// Runs once the effort is exhausted. May hand back a follow-up task.
    fn finish(&mut self, actor: &mut Actor, ctx: &mut TaskContext<'_>) -> Option<Task>;

    /// Undo whatever externally visible state the task changed.
    fn canceled(&mut self, _actor: &mut Actor, _ctx: &mut TaskContext<'_>) {}

    /// Whether this (suspended) task may stand in for a freshly requested `other`.
    fn can_resume_with(&self, _other: &Self, _actor: &Actor) -> bool {
        false
    }

    fn progress_message(&self, _effort: &Effort) -> ProgressMessage {
        ProgressMessage::NotImplemented
    }

    fn is_aborted(&self) -> bool {
        false
    }

    /// Build the task from its persisted payload.
    fn decode(data: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(data)
    }
}

/// DynActivity は object-safe な Activity の抽象化
///
/// `TypedActivity<T>` が実装し、`Box<dyn DynActivity>` として保持されます。
pub trait DynActivity: fmt::Debug + Send {
    fn kind(&self) -> &'static str;
    fn resumable(&self) -> bool;
    fn start_dyn(&mut self, effort: &mut Effort, actor: &mut Actor, ctx: &mut TaskContext<'_>);
    fn do_turn_dyn(
        &mut self,
        effort: &mut Effort,
        actor: &mut Actor,
        ctx: &mut TaskContext<'_>,
    ) -> Transition;
    fn finish_dyn(&mut self, actor: &mut Actor, ctx: &mut TaskContext<'_>) -> Option<Task>;
    fn canceled_dyn(&mut self, actor: &mut Actor, ctx: &mut TaskContext<'_>);
    fn can_resume_with_dyn(&self, other: &dyn DynActivity, actor: &Actor) -> bool;
    fn progress_message_dyn(&self, effort: &Effort) -> ProgressMessage;
    fn is_aborted_dyn(&self) -> bool;
    fn encode_dyn(&self) -> Result<Value, serde_json::Error>;
    fn clone_box(&self) -> Box<dyn DynActivity>;
    fn as_any(&self) -> &dyn Any;
}

/// 型消去用のラッパー
#[derive(Debug, Clone)]
pub struct TypedActivity<T: Activity> {
    inner: T,
}

impl<T: Activity> TypedActivity<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

impl<T: Activity> DynActivity for TypedActivity<T> {
    fn kind(&self) -> &'static str {
        T::KIND
    }

    fn resumable(&self) -> bool {
        T::RESUMABLE
    }

    fn start_dyn(&mut self, effort: &mut Effort, actor: &mut Actor, ctx: &mut TaskContext<'_>) {
        self.inner.start(effort, actor, ctx)
    }

    fn do_turn_dyn(
        &mut self,
        effort: &mut Effort,
        actor: &mut Actor,
        ctx: &mut TaskContext<'_>,
    ) -> Transition {
        self.inner.do_turn(effort, actor, ctx)
    }

    fn finish_dyn(&mut self, actor: &mut Actor, ctx: &mut TaskContext<'_>) -> Option<Task> {
        self.inner.finish(actor, ctx)
    }

    fn canceled_dyn(&mut self, actor: &mut Actor, ctx: &mut TaskContext<'_>) {
        self.inner.canceled(actor, ctx)
    }

    fn can_resume_with_dyn(&self, other: &dyn DynActivity, actor: &Actor) -> bool {
        // Downcasting also enforces "same kind".
        other
            .as_any()
            .downcast_ref::<TypedActivity<T>>()
            .is_some_and(|other| self.inner.can_resume_with(&other.inner, actor))
    }

    fn progress_message_dyn(&self, effort: &Effort) -> ProgressMessage {
        self.inner.progress_message(effort)
    }

    fn is_aborted_dyn(&self) -> bool {
        self.inner.is_aborted()
    }

    fn encode_dyn(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(&self.inner)
    }

    fn clone_box(&self) -> Box<dyn DynActivity> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Task はアクターが所有する実行単位
#[derive(Debug)]
pub struct Task {
    activity: Box<dyn DynActivity>,
    effort: Effort,
    started: bool,
}

impl Clone for Task {
    fn clone(&self) -> Self {
        Self {
            activity: self.activity.clone_box(),
            effort: self.effort,
            started: self.started,
        }
    }
}

impl Task {
    pub fn new<T: Activity>(activity: T) -> Self {
        Self::from_parts(Box::new(TypedActivity::new(activity)), Effort::default(), false)
    }

    pub(crate) fn from_parts(activity: Box<dyn DynActivity>, effort: Effort, started: bool) -> Self {
        Self {
            activity,
            effort,
            started,
        }
    }

    pub fn kind(&self) -> &'static str {
        self.activity.kind()
    }

    pub fn effort(&self) -> &Effort {
        &self.effort
    }

    pub fn is_resumable(&self) -> bool {
        self.activity.resumable()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_aborted(&self) -> bool {
        self.activity.is_aborted_dyn()
    }

    /// Make the next scheduler step run `start` again (resumption path).
    pub fn mark_resumed(&mut self) {
        self.started = false;
    }

    pub fn start(&mut self, actor: &mut Actor, ctx: &mut TaskContext<'_>) {
        self.activity.start_dyn(&mut self.effort, actor, ctx);
        self.started = true;
    }

    /// Budgeted tasks are charged from the actor's moves before the turn runs.
    pub fn do_turn(&mut self, actor: &mut Actor, ctx: &mut TaskContext<'_>) -> Transition {
        if !self.effort.is_indefinite() {
            let spent = self.effort.consume(i64::from(actor.moves));
            actor.moves -= spent as i32;
        }
        self.activity.do_turn_dyn(&mut self.effort, actor, ctx)
    }

    pub fn finish(&mut self, actor: &mut Actor, ctx: &mut TaskContext<'_>) -> Option<Task> {
        self.activity.finish_dyn(actor, ctx)
    }

    pub fn canceled(&mut self, actor: &mut Actor, ctx: &mut TaskContext<'_>) {
        self.activity.canceled_dyn(actor, ctx)
    }

    pub fn can_resume_with(&self, other: &Task, actor: &Actor) -> bool {
        self.kind() == other.kind() && self.activity.can_resume_with_dyn(other.activity.as_ref(), actor)
    }

    pub fn progress_message(&self) -> ProgressMessage {
        self.activity.progress_message_dyn(&self.effort)
    }

    /// The variant payload (`actor_data`).
    pub fn encode_data(&self) -> Result<Value, serde_json::Error> {
        self.activity.encode_dyn()
    }

    pub fn downcast_ref<T: Activity>(&self) -> Option<&T> {
        self.activity
            .as_any()
            .downcast_ref::<TypedActivity<T>>()
            .map(|typed| &typed.inner)
    }
}
