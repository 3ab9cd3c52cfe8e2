//! Zone port - タグ付き領域の検索
//!
//! ゾーンは軸に沿った直方体で、タグ（`LOOT_UNSORTED` など）を持ちます。
//! 目的地ゾーンの優先順位は実装側が決め、呼び出し側はその順序をそのまま使います。

use serde::{Deserialize, Serialize};

use crate::domain::{Item, Tripoint};

pub const LOOT_UNSORTED: &str = "LOOT_UNSORTED";
pub const LOOT_IGNORE: &str = "LOOT_IGNORE";
pub const LOOT_IGNORE_FAVORITES: &str = "LOOT_IGNORE_FAVORITES";
pub const LOOT_CUSTOM: &str = "LOOT_CUSTOM";

/// A tagged box of tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub name: String,
    pub tag: String,
    pub start: Tripoint,
    pub end: Tripoint,

    #[serde(default = "default_faction")]
    pub faction: String,

    /// Comma separated item name fragments (custom zones only).
    #[serde(default)]
    pub filter: Option<String>,

    #[serde(default = "enabled")]
    pub enabled: bool,

    /// Vehicle the zone is attached to; it moves with the vehicle.
    #[serde(default)]
    pub vehicle: Option<u32>,
}

fn default_faction() -> String {
    crate::domain::actor::DEFAULT_FACTION.to_string()
}

fn enabled() -> bool {
    true
}

impl Zone {
    pub fn new(name: impl Into<String>, tag: impl Into<String>, start: Tripoint, end: Tripoint) -> Self {
        Self {
            name: name.into(),
            tag: tag.into(),
            start,
            end,
            faction: default_faction(),
            filter: None,
            enabled: true,
            vehicle: None,
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    fn min(&self) -> Tripoint {
        Tripoint::new(
            self.start.x.min(self.end.x),
            self.start.y.min(self.end.y),
            self.start.z.min(self.end.z),
        )
    }

    fn max(&self) -> Tripoint {
        Tripoint::new(
            self.start.x.max(self.end.x),
            self.start.y.max(self.end.y),
            self.start.z.max(self.end.z),
        )
    }

    pub fn contains(&self, p: Tripoint) -> bool {
        let (lo, hi) = (self.min(), self.max());
        (lo.x..=hi.x).contains(&p.x) && (lo.y..=hi.y).contains(&p.y) && (lo.z..=hi.z).contains(&p.z)
    }

    /// Every tile of the zone: x fastest, then y, then z.
    pub fn tiles(&self) -> impl Iterator<Item = Tripoint> + use<> {
        let (lo, hi) = (self.min(), self.max());
        (lo.z..=hi.z).flat_map(move |z| {
            (lo.y..=hi.y).flat_map(move |y| (lo.x..=hi.x).map(move |x| Tripoint::new(x, y, z)))
        })
    }

    /// Chebyshev distance from `p` to the nearest tile of the zone.
    pub fn distance_to(&self, p: Tripoint) -> i32 {
        let (lo, hi) = (self.min(), self.max());
        let axis = |v: i32, lo: i32, hi: i32| (lo - v).max(v - hi).max(0);
        axis(p.x, lo.x, hi.x)
            .max(axis(p.y, lo.y, hi.y))
            .max(axis(p.z, lo.z, hi.z))
    }

    /// Shift the zone by `delta` (used when its vehicle moves).
    pub fn translate(&mut self, delta: Tripoint) {
        self.start = self.start + delta;
        self.end = self.end + delta;
    }
}

/// ZoneQuery はゾーン管理への問い合わせ
pub trait ZoneQuery {
    /// All tiles of `tag` zones within `radius` of `center`, deduplicated.
    fn zones_near(&self, tag: &str, center: Tripoint, radius: i32) -> Vec<Tripoint>;

    /// Destination zones eligible for `item`, in priority order.
    fn destination_zones_for(
        &self,
        item: &Item,
        center: Tripoint,
        radius: i32,
        faction: &str,
    ) -> Vec<Zone>;

    /// Whether `p` lies in any enabled zone tagged `tag`.
    fn has(&self, tag: &str, p: Tripoint) -> bool;
}
