//! Ports - 抽象化レイヤー
//!
//! タスクが触れる外部の世界（マップ、車両カーゴ、ゾーン、経路探索、
//! メッセージ）を trait として定義します。タスクは具体的な実装を知りません。
//!
//! # 設計原則
//! - グローバルな状態は持たない（すべて `TaskContext` 経由で渡す）
//! - 1 ターンに世界を変更するタスクは 1 つだけ（ロック不要）

pub mod map;
pub mod messages;
pub mod pathing;
pub mod zones;

pub use self::map::{CargoRef, ItemLocation, MapAccess};
pub use self::messages::{MessageKind, MessageLog};
pub use self::pathing::PathFinder;
pub use self::zones::{Zone, ZoneQuery};

/// World は全ポートをまとめた trait
///
/// 複数の `&mut` ポートを同時に渡すと借用が衝突するため、
/// 1 つの trait object として渡します。
pub trait World: MapAccess + ZoneQuery + PathFinder + MessageLog {}

impl<T: MapAccess + ZoneQuery + PathFinder + MessageLog> World for T {}
