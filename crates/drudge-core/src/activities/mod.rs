//! Activities - 具体的なタスク
//!
//! 各 Activity は `crate::typed::Activity` を実装し、
//! `TaskRegistry::with_builtin` に登録されています。
//!
//! # 構成
//! - `move_loot`: 未整理ゾーンの自動仕分け（中断・再開あり）
//! - `travel`: 経路の移動。中断中のタスクを到着時に再開させる
//! - `aim`, `dig`, `hacking`, `open_gate`: 単純なライフサイクルのタスク
//! - `migration_cancel`: 廃止された kind の置き換え

pub mod aim;
pub mod dig;
pub mod hacking;
pub mod migration_cancel;
pub mod move_loot;
pub mod open_gate;
pub mod travel;

pub use self::aim::Aim;
pub use self::dig::Dig;
pub use self::hacking::Hacking;
pub use self::migration_cancel::MigrationCancel;
pub use self::move_loot::{CachedItem, MoveLoot};
pub use self::open_gate::OpenGate;
pub use self::travel::Travel;
