//! Codec - Task と保存形式（JSON）の相互変換
//!
//! # 保存形式
//! ```text
//! null                                  // タスクなし
//! {
//!   "actor_type": "ACT_MOVE_LOOT",      // discriminator
//!   "actor_data": { ... },              // Activity 固有のフィールド
//!   "effort": { "remaining": .., "total": .. },
//!   "started": true
//! }
//! ```
//!
//! # 回復可能な失敗
//! 未知の `actor_type` や `actor_data` の欠落はロードを止めません。
//! `tracing::error!` でログを出し、タスクなし (`Ok(None)`) として扱います。
//!
//! セーブデータの読み込みには `restore_task` / `decode_backlog` を使います。
//! 壊れた payload も含め、読めないエントリはログを出して捨てます。
//! `decode_task` はそれ以外の失敗を `CodecError` として返すので、
//! 入力を検証したい呼び出し側（シナリオなど）向けです。

use std::collections::VecDeque;

use serde_json::{Map, Value, json};
use tracing::error;

use super::registry::TaskRegistry;
use super::task::Task;
use crate::domain::{CodecError, Effort};

const ACTOR_TYPE: &str = "actor_type";
const ACTOR_DATA: &str = "actor_data";
const EFFORT: &str = "effort";
const STARTED: &str = "started";

pub fn encode_task(task: Option<&Task>) -> Result<Value, CodecError> {
    let Some(task) = task else {
        return Ok(Value::Null);
    };
    Ok(json!({
        ACTOR_TYPE: task.kind(),
        ACTOR_DATA: task.encode_data()?,
        EFFORT: serde_json::to_value(task.effort())?,
        STARTED: task.is_started(),
    }))
}

pub fn decode_task(registry: &TaskRegistry, value: &Value) -> Result<Option<Task>, CodecError> {
    let obj = match value {
        Value::Null => return Ok(None),
        Value::Object(obj) => obj,
        _ => return Err(CodecError::Malformed),
    };

    let Some(data) = obj.get(ACTOR_DATA) else {
        error!("failed to load task: no {ACTOR_DATA}");
        return Ok(None);
    };
    let kind = obj
        .get(ACTOR_TYPE)
        .and_then(Value::as_str)
        .ok_or(CodecError::MissingField(ACTOR_TYPE))?;

    let activity = match registry.decode(kind, data.clone()) {
        Ok(activity) => activity,
        Err(CodecError::UnknownKind(kind)) => {
            error!(kind = %kind, "failed to find task decoder; dropping task");
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    let effort = read_effort(obj)?;
    let started = obj.get(STARTED).and_then(Value::as_bool).unwrap_or(false);
    Ok(Some(Task::from_parts(activity, effort, started)))
}

/// Like `decode_task`, but a corrupt entry is logged and yields no task.
pub fn restore_task(registry: &TaskRegistry, value: &Value) -> Option<Task> {
    decode_task(registry, value).unwrap_or_else(|e| {
        let kind = value.get(ACTOR_TYPE).and_then(Value::as_str).unwrap_or("?");
        error!(kind, error = %e, "failed to load task; dropping task");
        None
    })
}

fn read_effort(obj: &Map<String, Value>) -> Result<Effort, CodecError> {
    match obj.get(EFFORT) {
        Some(value) => Ok(serde_json::from_value(value.clone())?),
        None => Ok(Effort::default()),
    }
}

pub fn encode_backlog<'a>(backlog: impl IntoIterator<Item = &'a Task>) -> Result<Value, CodecError> {
    let entries = backlog
        .into_iter()
        .map(|task| encode_task(Some(task)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::Array(entries))
}

/// Entries that fail to restore are dropped; order is kept.
pub fn decode_backlog(registry: &TaskRegistry, value: &Value) -> VecDeque<Task> {
    match value {
        Value::Null => VecDeque::new(),
        Value::Array(entries) => entries
            .iter()
            .filter_map(|entry| restore_task(registry, entry))
            .collect(),
        _ => {
            error!("failed to load backlog: not an array");
            VecDeque::new()
        }
    }
}
