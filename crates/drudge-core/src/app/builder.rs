//! EngineBuilder - エンジンの構築とワイヤリング
//!
//! `EngineBuilder` は `TaskRegistry` と `Scheduler`（設定と乱数シード）を
//! 組み立て、期待される kind がすべて登録済みかを `build()` で確かめます。
//! `Engine` はアクターのタスク（実行中 + backlog）を `SavedTasks` として
//! 保存・復元します。復元は壊れたエントリを捨てて続行します。

use serde_json::Value;

use super::scheduler::Scheduler;
use crate::domain::{Actor, CodecError, EngineConfig, RegistryError};
use crate::typed::{Activity, TaskRegistry, decode_backlog, encode_backlog, encode_task, restore_task};

/// EngineBuilder はエンジンを構築
///
/// # 使用例
/// ```ignore
/// let engine = EngineBuilder::new()
///     .register::<MyActivity>()?
///     .expect_kinds(&["ACT_MOVE_LOOT", "ACT_MY_ACTIVITY"])
///     .seed(7)
///     .build()?;
/// ```
///
/// # Fail-fast 設計
/// - expect_kinds() で期待される kind を登録
/// - build() 時に「期待集合 ⊆ 登録済み集合」をチェック
/// - 不足があれば BuildError を返す
pub struct EngineBuilder {
    registry: TaskRegistry,
    expected_kinds: Option<Vec<String>>,
    config: EngineConfig,
    seed: Option<u64>,
}

/// BuildError はエンジン構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Missing task kinds: {0:?}. These kinds were expected but not registered.")]
    MissingKinds(Vec<String>),
}

impl EngineBuilder {
    /// 組み込みの Activity を登録済みの EngineBuilder を作成
    pub fn new() -> Self {
        Self {
            registry: TaskRegistry::with_builtin(),
            expected_kinds: None,
            config: EngineConfig::default(),
            seed: None,
        }
    }

    /// 何も登録されていない EngineBuilder を作成
    pub fn empty() -> Self {
        Self {
            registry: TaskRegistry::new(),
            ..Self::new()
        }
    }

    /// Activity を登録
    pub fn register<T: Activity>(mut self) -> Result<Self, RegistryError> {
        self.registry.register::<T>()?;
        Ok(self)
    }

    /// 期待される kind のリストを設定
    pub fn expect_kinds(mut self, kinds: &[&str]) -> Self {
        self.expected_kinds = Some(kinds.iter().map(|kind| kind.to_string()).collect());
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// 乱数シードを固定（テスト・リプレイ用）
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// EngineBuilder を構築して Engine を生成
    ///
    /// # 検証
    /// - expect_kinds() で設定された kind が全て登録されているかチェック
    /// - 不足があれば BuildError::MissingKinds を返す
    pub fn build(self) -> Result<Engine, BuildError> {
        if let Some(expected) = &self.expected_kinds {
            let missing: Vec<String> = expected
                .iter()
                .filter(|kind| !self.registry.contains(kind))
                .cloned()
                .collect();
            if !missing.is_empty() {
                return Err(BuildError::MissingKinds(missing));
            }
        }
        let scheduler = match self.seed {
            Some(seed) => Scheduler::with_seed(self.config, seed),
            None => Scheduler::new(self.config),
        };
        Ok(Engine {
            registry: self.registry,
            scheduler,
        })
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Engine はレジストリとスケジューラの組
pub struct Engine {
    pub registry: TaskRegistry,
    pub scheduler: Scheduler,
}

impl Engine {
    /// Active task and backlog of `actor`, as saved data.
    pub fn save_tasks(&self, actor: &Actor) -> Result<SavedTasks, CodecError> {
        Ok(SavedTasks {
            activity: encode_task(actor.activity.as_ref())?,
            backlog: encode_backlog(&actor.backlog)?,
        })
    }

    /// Replace `actor`'s tasks with saved ones.
    ///
    /// Unknown kinds and corrupt entries are logged and dropped; the rest
    /// still loads.
    pub fn load_tasks(&self, actor: &mut Actor, saved: &SavedTasks) {
        actor.activity = restore_task(&self.registry, &saved.activity);
        actor.backlog = decode_backlog(&self.registry, &saved.backlog);
    }
}

/// Persisted task slots of one actor.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SavedTasks {
    pub activity: Value,
    #[serde(default)]
    pub backlog: Value,
}
