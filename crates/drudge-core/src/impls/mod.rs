//! Impls - 実装（開発用・テスト用）
//!
//! このモジュールには ports の実装を含めます。
//!
//! # 含まれる実装
//! - **GridWorld**: `World` のインメモリ実装
//! - **Scenario**: JSON からワールド・アクター・タスクを組み立てる

pub mod grid_world;
pub mod scenario;

// 主要な型を再エクスポート
pub use self::grid_world::{CargoPart, GROUND_CAPACITY, GridWorld, LoggedMessage};
pub use self::scenario::{Loaded, Scenario, ScenarioError};
