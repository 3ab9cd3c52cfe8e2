//! GridWorld - 開発用・テスト用のインメモリワールド
//!
//! `MapAccess` / `ZoneQuery` / `PathFinder` / `MessageLog` をまとめて実装します。
//!
//! # モデル
//! - 矩形グリッド（x: `0..width`, y: `0..height`）。z は任意だが経路探索は同一 z のみ
//! - 地面の容量は 1 タイル 1000 L
//! - 車両の荷台（cargo part）は位置・容量・破損フラグを持つ。
//!   破損した荷台も `cargo_at` には現れるが、空き容量は 0
//! - 車両に紐づくゾーンは車両と一緒に動く
//!
//! # 行き先ゾーンの優先順位
//! 1. フィルタが item 名にマッチする `LOOT_CUSTOM`
//! 2. カテゴリのゾーン `LOOT_<CATEGORY>`（無ければ代替カテゴリ）
//! 3. フィルタなしの `LOOT_CUSTOM`
//!
//! 各段の中ではゾーンの登録順です。

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::domain::{Item, ItemId, Tripoint, Volume};
use crate::ports::zones::LOOT_CUSTOM;
use crate::ports::{
    CargoRef, ItemLocation, MapAccess, MessageKind, MessageLog, PathFinder, Zone, ZoneQuery,
};

pub const GROUND_CAPACITY: Volume = Volume::liters(1000);
pub const DEFAULT_TERRAIN: &str = "t_dirt";

/// Category zones that stand in when an item's own category has none nearby.
const CATEGORY_FALLBACKS: &[(&str, &str)] = &[
    ("LOOT_FCLOTHING", "LOOT_CLOTHING"),
    ("LOOT_PDRINK", "LOOT_DRINK"),
    ("LOOT_DRINK", "LOOT_FOOD"),
    ("LOOT_PFOOD", "LOOT_FOOD"),
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Tile {
    terrain: Option<String>,
    items: Vec<Item>,
    fire: bool,
    no_items: bool,
    impassable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CargoPart {
    pub pos: Tripoint,
    pub capacity: Volume,
    #[serde(default)]
    pub broken: bool,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl CargoPart {
    fn used(&self) -> Volume {
        self.items.iter().map(Item::volume).sum()
    }

    fn free(&self) -> Volume {
        if self.broken {
            return Volume::ZERO;
        }
        self.capacity - self.used()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedMessage {
    pub kind: MessageKind,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct GridWorld {
    width: i32,
    height: i32,
    tiles: BTreeMap<Tripoint, Tile>,
    cargo: BTreeMap<CargoRef, CargoPart>,
    zones: Vec<Zone>,
    messages: Vec<LoggedMessage>,
}

impl GridWorld {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, p: Tripoint) -> bool {
        (0..self.width).contains(&p.x) && (0..self.height).contains(&p.y)
    }

    fn tile(&self, p: Tripoint) -> Option<&Tile> {
        self.tiles.get(&p)
    }

    fn tile_mut(&mut self, p: Tripoint) -> &mut Tile {
        self.tiles.entry(p).or_default()
    }

    pub fn set_wall(&mut self, p: Tripoint) {
        let tile = self.tile_mut(p);
        tile.impassable = true;
        tile.terrain = Some("t_wall".to_string());
    }

    pub fn set_fire(&mut self, p: Tripoint) {
        self.tile_mut(p).fire = true;
    }

    /// Mark `p` as unable to hold items (deep water, open air, ...).
    pub fn set_no_items(&mut self, p: Tripoint) {
        self.tile_mut(p).no_items = true;
    }

    pub fn add_zone(&mut self, zone: Zone) -> usize {
        self.zones.push(zone);
        self.zones.len() - 1
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn zone_mut(&mut self, index: usize) -> Option<&mut Zone> {
        self.zones.get_mut(index)
    }

    /// Exchange the priority of two zones.
    pub fn swap_zones(&mut self, a: usize, b: usize) {
        self.zones.swap(a, b);
    }

    /// Place an item on the ground, ignoring capacity.
    pub fn add_ground_item(&mut self, p: Tripoint, item: Item) -> ItemId {
        let id = item.id;
        self.tile_mut(p).items.push(item);
        id
    }

    /// Place `count` copies of `item` on the ground.
    pub fn add_ground_items(&mut self, p: Tripoint, item: &Item, count: usize) {
        for _ in 0..count {
            self.add_ground_item(p, item.duplicate());
        }
    }

    pub fn add_cargo(&mut self, cargo: CargoRef, pos: Tripoint, capacity: Volume) {
        self.cargo.insert(
            cargo,
            CargoPart {
                pos,
                capacity,
                broken: false,
                items: Vec::new(),
            },
        );
    }

    pub fn add_cargo_part(&mut self, cargo: CargoRef, part: CargoPart) {
        self.cargo.insert(cargo, part);
    }

    /// Place an item in a cargo part, ignoring capacity. `None` if the part does not exist.
    pub fn add_cargo_item(&mut self, cargo: CargoRef, item: Item) -> Option<ItemId> {
        let part = self.cargo.get_mut(&cargo)?;
        let id = item.id;
        part.items.push(item);
        Some(id)
    }

    pub fn break_cargo(&mut self, cargo: CargoRef) {
        if let Some(part) = self.cargo.get_mut(&cargo) {
            part.broken = true;
        }
    }

    pub fn cargo_part(&self, cargo: CargoRef) -> Option<&CargoPart> {
        self.cargo.get(&cargo)
    }

    /// Move a whole vehicle, its cargo and the zones attached to it.
    pub fn move_vehicle(&mut self, vehicle: u32, delta: Tripoint) {
        for (_, part) in self.cargo.iter_mut().filter(|(c, _)| c.vehicle == vehicle) {
            part.pos = part.pos + delta;
        }
        for zone in self.zones.iter_mut().filter(|z| z.vehicle == Some(vehicle)) {
            zone.translate(delta);
        }
    }

    pub fn items_at(&self, p: Tripoint) -> &[Item] {
        self.tile(p).map(|t| t.items.as_slice()).unwrap_or(&[])
    }

    /// Number of items named `name` at `loc` (stacks count by their size).
    pub fn count_named(&self, loc: ItemLocation, name: &str) -> u32 {
        self.slot(loc)
            .map(|items| items.iter().filter(|i| i.name == name).map(|i| i.count).sum())
            .unwrap_or(0)
    }

    pub fn messages(&self) -> &[LoggedMessage] {
        &self.messages
    }

    pub fn take_messages(&mut self) -> Vec<LoggedMessage> {
        std::mem::take(&mut self.messages)
    }

    fn slot(&self, loc: ItemLocation) -> Option<&Vec<Item>> {
        match loc {
            ItemLocation::Ground(p) => self.tile(p).map(|t| &t.items),
            ItemLocation::Cargo(c) => self.cargo.get(&c).map(|part| &part.items),
        }
    }

    fn slot_mut(&mut self, loc: ItemLocation) -> Option<&mut Vec<Item>> {
        match loc {
            ItemLocation::Ground(p) => Some(&mut self.tile_mut(p).items),
            ItemLocation::Cargo(c) => self.cargo.get_mut(&c).map(|part| &mut part.items),
        }
    }

    fn zone_in_reach(zone: &Zone, center: Tripoint, radius: i32, faction: &str) -> bool {
        zone.enabled && zone.faction == faction && zone.distance_to(center) <= radius
    }

    /// Breadth-first search over the eight neighbours on one level.
    ///
    /// Returns the path to the first tile satisfying `goal`, excluding `from`.
    fn bfs(&self, from: Tripoint, goal: impl Fn(Tripoint) -> bool) -> Vec<Tripoint> {
        let mut came_from: HashMap<Tripoint, Tripoint> = HashMap::new();
        let mut queue = VecDeque::from([from]);
        came_from.insert(from, from);

        while let Some(current) = queue.pop_front() {
            if current != from && goal(current) {
                let mut path = vec![current];
                let mut step = current;
                while let Some(&prev) = came_from.get(&step) {
                    if prev == from {
                        break;
                    }
                    path.push(prev);
                    step = prev;
                }
                path.reverse();
                return path;
            }
            for next in current.neighbours() {
                if self.passable(next) && !came_from.contains_key(&next) {
                    came_from.insert(next, current);
                    queue.push_back(next);
                }
            }
        }
        Vec::new()
    }
}

/// Comma-separated filter fragments, each a case-insensitive substring of the name.
fn filter_matches(filter: &str, name: &str) -> bool {
    let name = name.to_lowercase();
    filter
        .split(',')
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .any(|fragment| name.contains(&fragment.to_lowercase()))
}

fn category_tags(category: &str) -> Vec<String> {
    if category.is_empty() {
        return Vec::new();
    }
    let mut tags = vec![format!("LOOT_{}", category.to_uppercase())];
    while let Some(&(_, next)) = CATEGORY_FALLBACKS
        .iter()
        .find(|(from, _)| tags.last().is_some_and(|last| last == from))
    {
        tags.push(next.to_string());
    }
    tags
}

impl MapAccess for GridWorld {
    fn can_hold_items(&self, p: Tripoint) -> bool {
        self.in_bounds(p) && self.tile(p).is_none_or(|t| !t.no_items && !t.impassable)
    }

    fn on_fire(&self, p: Tripoint) -> bool {
        self.tile(p).is_some_and(|t| t.fire)
    }

    fn passable(&self, p: Tripoint) -> bool {
        self.in_bounds(p) && self.tile(p).is_none_or(|t| !t.impassable)
    }

    fn item_count(&self, p: Tripoint) -> usize {
        self.items_at(p).len()
    }

    fn free_volume(&self, p: Tripoint) -> Volume {
        GROUND_CAPACITY - self.items_at(p).iter().map(Item::volume).sum::<Volume>()
    }

    fn cargo_at(&self, p: Tripoint) -> Option<CargoRef> {
        self.cargo
            .iter()
            .find(|(_, part)| part.pos == p)
            .map(|(cargo, _)| *cargo)
    }

    fn cargo_free_volume(&self, cargo: CargoRef) -> Volume {
        self.cargo.get(&cargo).map_or(Volume::ZERO, CargoPart::free)
    }

    fn items(&self, loc: ItemLocation) -> Vec<ItemId> {
        self.slot(loc)
            .map(|items| items.iter().map(|i| i.id).collect())
            .unwrap_or_default()
    }

    fn item(&self, loc: ItemLocation, id: ItemId) -> Option<&Item> {
        self.slot(loc)?.iter().find(|i| i.id == id)
    }

    fn take_item(&mut self, loc: ItemLocation, id: ItemId) -> Option<Item> {
        let items = self.slot_mut(loc)?;
        let index = items.iter().position(|i| i.id == id)?;
        Some(items.remove(index))
    }

    fn put_item(&mut self, loc: ItemLocation, item: Item) -> Result<(), Item> {
        let fits = match loc {
            ItemLocation::Ground(p) => self.can_hold_items(p) && self.free_volume(p) >= item.volume(),
            ItemLocation::Cargo(c) => self.cargo.contains_key(&c) && self.cargo_free_volume(c) >= item.volume(),
        };
        if !fits {
            return Err(item);
        }
        match self.slot_mut(loc) {
            Some(items) => {
                items.push(item);
                Ok(())
            }
            None => Err(item),
        }
    }

    fn spawn_item(&mut self, p: Tripoint, item: Item) {
        self.tile_mut(p).items.push(item);
    }

    fn terrain(&self, p: Tripoint) -> &str {
        self.tile(p)
            .and_then(|t| t.terrain.as_deref())
            .unwrap_or(DEFAULT_TERRAIN)
    }

    fn set_terrain(&mut self, p: Tripoint, terrain: &str) {
        self.tile_mut(p).terrain = Some(terrain.to_string());
    }
}

impl ZoneQuery for GridWorld {
    fn zones_near(&self, tag: &str, center: Tripoint, radius: i32) -> Vec<Tripoint> {
        let tiles: BTreeSet<Tripoint> = self
            .zones
            .iter()
            .filter(|z| z.enabled && z.tag == tag)
            .flat_map(|z| z.tiles())
            .filter(|p| p.square_dist(center) <= radius)
            .collect();
        tiles.into_iter().collect()
    }

    fn destination_zones_for(
        &self,
        item: &Item,
        center: Tripoint,
        radius: i32,
        faction: &str,
    ) -> Vec<Zone> {
        let reachable: Vec<&Zone> = self
            .zones
            .iter()
            .filter(|z| Self::zone_in_reach(z, center, radius, faction))
            .collect();

        let mut out: Vec<Zone> = reachable
            .iter()
            .filter(|z| z.tag == LOOT_CUSTOM)
            .filter(|z| z.filter.as_deref().is_some_and(|f| filter_matches(f, &item.name)))
            .map(|z| (*z).clone())
            .collect();

        let category_zones = category_tags(&item.category).into_iter().find_map(|tag| {
            let zones: Vec<Zone> = reachable
                .iter()
                .filter(|z| z.tag == tag)
                .map(|z| (*z).clone())
                .collect();
            (!zones.is_empty()).then_some(zones)
        });
        out.extend(category_zones.unwrap_or_default());

        out.extend(
            reachable
                .iter()
                .filter(|z| z.tag == LOOT_CUSTOM)
                .filter(|z| z.filter.as_deref().is_none_or(|f| f.trim().is_empty()))
                .map(|z| (*z).clone()),
        );
        out
    }

    fn has(&self, tag: &str, p: Tripoint) -> bool {
        self.zones
            .iter()
            .any(|z| z.enabled && z.tag == tag && z.contains(p))
    }
}

impl PathFinder for GridWorld {
    fn route_to_adjacent(&self, from: Tripoint, target: Tripoint) -> Vec<Tripoint> {
        if from.is_adjacent_or_at(target) {
            return Vec::new();
        }
        self.bfs(from, |p| p != target && p.is_adjacent_or_at(target))
    }

    fn route_to(&self, from: Tripoint, target: Tripoint) -> Vec<Tripoint> {
        if from == target {
            return Vec::new();
        }
        self.bfs(from, |p| p == target)
    }
}

impl MessageLog for GridWorld {
    fn add_msg(&mut self, kind: MessageKind, text: String) {
        tracing::debug!(?kind, %text, "message");
        self.messages.push(LoggedMessage { kind, text });
    }
}
