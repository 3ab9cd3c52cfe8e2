//! Map port - 地形・アイテム・車両カーゴへのアクセス
//!
//! 座標はすべて絶対座標 (`Tripoint`) です。
//!
//! # カーゴの扱い
//! - タイル上に車両のカーゴ部品があれば `cargo_at` がそれを返す
//! - 壊れた部品もアイテムを保持したまま返される（取り出し元としては有効）
//! - 壊れた部品の空き容量は 0（置き場所としては使えない）

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{Item, ItemId, Tripoint, Volume};

/// A cargo part of a vehicle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CargoRef {
    pub vehicle: u32,
    pub part: u32,
}

impl fmt::Display for CargoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vehicle {} part {}", self.vehicle, self.part)
    }
}

/// Where an item lives: on the ground of a tile or inside a cargo part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemLocation {
    Ground(Tripoint),
    Cargo(CargoRef),
}

/// MapAccess は地形とアイテム置き場への問い合わせ・変更
pub trait MapAccess {
    /// Terrain and furniture allow placing items here.
    fn can_hold_items(&self, p: Tripoint) -> bool;

    fn on_fire(&self, p: Tripoint) -> bool;

    fn passable(&self, p: Tripoint) -> bool;

    /// Number of items on the ground (cargo not included).
    fn item_count(&self, p: Tripoint) -> usize;

    /// Free volume of the ground stack.
    fn free_volume(&self, p: Tripoint) -> Volume;

    fn cargo_at(&self, p: Tripoint) -> Option<CargoRef>;

    fn cargo_free_volume(&self, cargo: CargoRef) -> Volume;

    /// Ids of the items at `loc`, in stack order.
    fn items(&self, loc: ItemLocation) -> Vec<ItemId>;

    fn item(&self, loc: ItemLocation, id: ItemId) -> Option<&Item>;

    fn take_item(&mut self, loc: ItemLocation, id: ItemId) -> Option<Item>;

    /// Place an item. On refusal the item is handed back untouched.
    fn put_item(&mut self, loc: ItemLocation, item: Item) -> Result<(), Item>;

    /// Drop an item on the ground regardless of capacity.
    fn spawn_item(&mut self, p: Tripoint, item: Item);

    fn terrain(&self, p: Tripoint) -> &str;

    fn set_terrain(&mut self, p: Tripoint, terrain: &str);
}
