//! App - アプリケーション層
//!
//! このモジュールは、typed と ports を組み合わせてターン進行を実装します。
//!
//! # 主要コンポーネント
//! - **EngineBuilder**: エンジンの構築と起動時検証
//! - **Scheduler**: アクターごとのライフサイクル駆動
//! - **ActorStatus**: 進捗のスナップショット

pub mod builder;
pub mod scheduler;
pub mod status;

// 主要な型を再エクスポート
pub use self::builder::{BuildError, Engine, EngineBuilder, SavedTasks};
pub use self::scheduler::{RunReport, Scheduler};
pub use self::status::{ActorStatus, TaskStatus};
