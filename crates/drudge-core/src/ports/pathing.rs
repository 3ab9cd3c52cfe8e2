//! Path port - 経路探索
//!
//! 返す経路は出発地点を含まず、目的地を最後に含みます。
//! 空の経路は「到達不能」を意味します。

use crate::domain::Tripoint;

pub trait PathFinder {
    /// Route to the nearest tile adjacent to `target`.
    ///
    /// Empty when no adjacent tile is reachable or `from` is already adjacent.
    fn route_to_adjacent(&self, from: Tripoint, target: Tripoint) -> Vec<Tripoint>;

    fn route_to(&self, from: Tripoint, target: Tripoint) -> Vec<Tripoint>;
}
