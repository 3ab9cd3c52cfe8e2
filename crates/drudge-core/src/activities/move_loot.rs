//! Automatic loot sorting (`ACT_MOVE_LOOT`).
//!
//! The actor empties every `LOOT_UNSORTED` tile in range by hauling each
//! item to the first destination tile that accepts it.
//!
//! # Scan cursor
//! All progress lives in the task's own fields so the scan survives both a
//! suspension (walking to the next source tile) and a save/load cycle:
//!
//! - `pending_source_points`: source tiles still to process, nearest first.
//!   The front entry is the tile being worked on.
//! - `current_tile_item_cache`: work queue of the front tile's items. It is
//!   drained before the front tile is popped and is empty between tiles.
//!
//! Partial failures (no room anywhere, no route) are only collected here and
//! summarised once by `finish`.
//!
//! # Ordering
//! - Source tiles nearest to the actor first (stable on ties).
//! - Destination zones in the order the zone query returns them.
//! - Tiles within a zone in the zone's tile order; the first tile with room
//!   wins, not the best fit.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::travel::Travel;
use crate::domain::{
    Actor, Effort, Item, ItemId, ProgressMessage, Route, Transition, Tripoint, direction_suffix,
    sort_by_distance,
};
use crate::ports::zones::{LOOT_IGNORE, LOOT_IGNORE_FAVORITES, LOOT_UNSORTED};
use crate::ports::{CargoRef, ItemLocation, MessageKind, World, Zone};
use crate::typed::{Activity, Task, TaskContext};

/// One item of the tile being sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedItem {
    pub item: ItemId,
    pub in_cargo: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveLoot {
    pending_source_points: VecDeque<Tripoint>,
    current_tile_item_cache: VecDeque<CachedItem>,
    origin_point: Tripoint,
    unreachable_source_points: Vec<Tripoint>,
    last_relocation_distance: usize,

    /// Source tiles that kept at least one item for lack of room.
    move_failed_source_points: Vec<Tripoint>,
}

/// Where an item is headed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Destination {
    tile: Tripoint,
    cargo: Option<CargoRef>,
}

impl Destination {
    fn location(self) -> ItemLocation {
        match self.cargo {
            Some(cargo) => ItemLocation::Cargo(cargo),
            None => ItemLocation::Ground(self.tile),
        }
    }
}

impl MoveLoot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_source_points(&self) -> &VecDeque<Tripoint> {
        &self.pending_source_points
    }

    pub fn current_tile_item_cache(&self) -> &VecDeque<CachedItem> {
        &self.current_tile_item_cache
    }

    pub fn origin_point(&self) -> Tripoint {
        self.origin_point
    }

    pub fn unreachable_source_points(&self) -> &[Tripoint] {
        &self.unreachable_source_points
    }

    pub fn last_relocation_distance(&self) -> usize {
        self.last_relocation_distance
    }

    pub fn move_failed_source_points(&self) -> &[Tripoint] {
        &self.move_failed_source_points
    }

    /// Re-order pending tiles by distance from `from`.
    ///
    /// A tile whose items are half processed stays at the front so the
    /// cache keeps matching it.
    fn resort(&mut self, from: Tripoint) {
        let pinned = if self.current_tile_item_cache.is_empty() {
            None
        } else {
            self.pending_source_points.pop_front()
        };
        let mut rest: Vec<Tripoint> = self.pending_source_points.drain(..).collect();
        sort_by_distance(&mut rest, from);
        self.pending_source_points = pinned.into_iter().chain(rest).collect();
    }

    fn seed_sources(&mut self, actor: &Actor, ctx: &mut TaskContext<'_>) {
        let radius = ctx.config.search_radius;
        let world = &*ctx.world;

        let mut sources: Vec<Tripoint> = world
            .zones_near(LOOT_UNSORTED, actor.pos, radius)
            .into_iter()
            // Lit braziers, filled kilns and the like keep their contents.
            .filter(|&p| !world.has(LOOT_IGNORE, p) && !world.on_fire(p) && world.can_hold_items(p))
            .filter(|&p| has_movable_items(world, p))
            .collect();
        sort_by_distance(&mut sources, actor.pos);

        self.pending_source_points = sources.into();
    }

    fn fill_cache(&mut self, src: Tripoint, world: &dyn World) {
        if let Some(cargo) = world.cargo_at(src) {
            self.current_tile_item_cache.extend(
                world
                    .items(ItemLocation::Cargo(cargo))
                    .into_iter()
                    .map(|item| CachedItem { item, in_cargo: true }),
            );
        }
        self.current_tile_item_cache.extend(
            world
                .items(ItemLocation::Ground(src))
                .into_iter()
                .map(|item| CachedItem { item, in_cargo: false }),
        );
    }

    fn record_unreachable(&mut self, src: Tripoint) {
        if !self.unreachable_source_points.contains(&src) {
            self.unreachable_source_points.push(src);
        }
    }

    fn record_move_failure(&mut self, src: Tripoint) {
        if !self.move_failed_source_points.contains(&src) {
            self.move_failed_source_points.push(src);
        }
    }
}

fn should_skip(item: &Item, src: Tripoint, world: &dyn World) -> bool {
    item.liquid || (item.favorite && world.has(LOOT_IGNORE_FAVORITES, src))
}

fn has_movable_items(world: &dyn World, p: Tripoint) -> bool {
    let cargo = world.cargo_at(p).map(ItemLocation::Cargo);
    cargo
        .into_iter()
        .chain([ItemLocation::Ground(p)])
        .any(|loc| {
            world
                .items(loc)
                .into_iter()
                .filter_map(|id| world.item(loc, id))
                .any(|item| !should_skip(item, p, world))
        })
}

/// First tile of the first zone with room for `item`.
fn find_destination(
    zones: &[Zone],
    item: &Item,
    src: Tripoint,
    ctx: &TaskContext<'_>,
) -> Option<Destination> {
    let world = &*ctx.world;
    let volume = item.volume();
    zones
        .iter()
        .flat_map(|zone| zone.tiles())
        .filter(|tile| tile.square_dist(src) <= ctx.config.search_radius)
        .filter(|&tile| {
            world.can_hold_items(tile) && world.item_count(tile) < ctx.config.max_items_per_tile
        })
        .find_map(|tile| {
            // With a cargo part present the ground beneath is not considered.
            let cargo = world.cargo_at(tile);
            let free = match cargo {
                Some(cargo) => world.cargo_free_volume(cargo),
                None => world.free_volume(tile),
            };
            (free >= volume).then_some(Destination { tile, cargo })
        })
}

impl Activity for MoveLoot {
    const KIND: &'static str = "ACT_MOVE_LOOT";
    const RESUMABLE: bool = true;

    fn start(&mut self, effort: &mut Effort, actor: &mut Actor, ctx: &mut TaskContext<'_>) {
        // Open-ended: only the scan itself knows when it is done.
        effort.set_indefinite();

        if !self.pending_source_points.is_empty() {
            if self.last_relocation_distance > ctx.config.resort_threshold {
                debug!(
                    distance = self.last_relocation_distance,
                    "long relocation, re-sorting source tiles"
                );
                self.resort(actor.pos);
            }
            return;
        }

        self.origin_point = actor.pos;
        self.seed_sources(actor, ctx);
        info!(
            actor = %actor.name,
            sources = self.pending_source_points.len(),
            "loot sorting started"
        );
    }

    fn do_turn(
        &mut self,
        effort: &mut Effort,
        actor: &mut Actor,
        ctx: &mut TaskContext<'_>,
    ) -> Transition {
        let radius = ctx.config.search_radius;

        while let Some(&src) = self.pending_source_points.front() {
            if self.current_tile_item_cache.is_empty() {
                self.fill_cache(src, &*ctx.world);
            }
            debug!(%src, items = self.current_tile_item_cache.len(), "sorting tile");

            let source_cargo = ctx.world.cargo_at(src);

            while let Some(cached) = self.current_tile_item_cache.front().copied() {
                let from = match (cached.in_cargo, source_cargo) {
                    (false, _) => ItemLocation::Ground(src),
                    (true, Some(cargo)) => ItemLocation::Cargo(cargo),
                    (true, None) => {
                        warn!(%src, item = %cached.item, "cargo vanished from source tile");
                        self.current_tile_item_cache.pop_front();
                        continue;
                    }
                };
                let Some(item) = ctx.world.item(from, cached.item).cloned() else {
                    warn!(%src, item = %cached.item, "cached item vanished");
                    self.current_tile_item_cache.pop_front();
                    continue;
                };

                if should_skip(&item, src, &*ctx.world) {
                    self.current_tile_item_cache.pop_front();
                    continue;
                }

                let zones = ctx
                    .world
                    .destination_zones_for(&item, src, radius, &actor.faction);
                if zones.is_empty() || zones.iter().any(|zone| zone.contains(src)) {
                    // Nowhere to go, or already where it belongs.
                    self.current_tile_item_cache.pop_front();
                    continue;
                }

                let Some(dest) = find_destination(&zones, &item, src, ctx) else {
                    debug!(%src, item = %item.name, "no destination tile has room");
                    self.record_move_failure(src);
                    self.current_tile_item_cache.pop_front();
                    continue;
                };

                if actor.pos.square_dist(src) > 1 {
                    let route = ctx.world.route_to_adjacent(actor.pos, src);
                    if route.is_empty() {
                        debug!(%src, "source tile unreachable");
                        self.record_unreachable(src);
                        break;
                    }
                    self.last_relocation_distance = route.len();
                    debug!(%src, steps = route.len(), "walking to source tile");
                    return Transition::Suspend(Route::new(route));
                }

                match ctx.world.take_item(from, item.id) {
                    Some(moving) => {
                        if let Err(refused) = ctx.world.put_item(dest.location(), moving) {
                            warn!(item = %refused.name, to = %dest.tile, "destination refused item");
                            // Back where it came from; it left this spot a moment ago.
                            if let Err(lost) = ctx.world.put_item(from, refused) {
                                ctx.world.spawn_item(src, lost);
                            }
                            self.record_move_failure(src);
                        } else {
                            debug!(item = %item.name, from = %src, to = %dest.tile, "moved item");
                            actor.moves -= ctx.config.item_move_cost;
                        }
                    }
                    None => warn!(%src, item = %item.id, "item disappeared before the move"),
                }
                self.current_tile_item_cache.pop_front();

                if actor.moves <= 0 {
                    if self.current_tile_item_cache.is_empty() {
                        self.pending_source_points.pop_front();
                    }
                    return Transition::Continue;
                }
            }

            self.pending_source_points.pop_front();
            self.current_tile_item_cache.clear();
        }

        effort.exhaust();
        Transition::Continue
    }

    fn finish(&mut self, actor: &mut Actor, ctx: &mut TaskContext<'_>) -> Option<Task> {
        ctx.world.add_msg(
            MessageKind::Info,
            format!("{} sorted out every item possible.", actor.name),
        );
        if !self.move_failed_source_points.is_empty() {
            ctx.world.add_msg(
                MessageKind::Info,
                format!(
                    "{} can't move some items to the destination zone. No available destination point.",
                    actor.name
                ),
            );
        }
        if !self.unreachable_source_points.is_empty() {
            let directions = self
                .unreachable_source_points
                .iter()
                .map(|&p| direction_suffix(self.origin_point, p))
                .collect::<Vec<_>>()
                .join(" ");
            ctx.world.add_msg(
                MessageKind::Info,
                format!(
                    "{} can't reach the source tile at {} from the start point. Try to sort out loot without a cart.",
                    actor.name, directions
                ),
            );
        }
        info!(
            actor = %actor.name,
            unreachable = self.unreachable_source_points.len(),
            crowded = self.move_failed_source_points.len(),
            "loot sorting finished"
        );

        if actor.is_npc() {
            actor.revert_after_activity();
            return None;
        }
        let route = ctx.world.route_to_adjacent(actor.pos, self.origin_point);
        if route.is_empty() {
            return None;
        }
        Some(Task::new(Travel::new(Route::new(route), None)))
    }

    // Unreachable tiles are only reported from `finish`.
    fn canceled(&mut self, _actor: &mut Actor, _ctx: &mut TaskContext<'_>) {}

    fn can_resume_with(&self, _other: &Self, _actor: &Actor) -> bool {
        // A fresh request carries no parameters of its own.
        true
    }

    fn progress_message(&self, _effort: &Effort) -> ProgressMessage {
        ProgressMessage::ExtraInfo(format!(
            "{} tiles left",
            self.pending_source_points.len()
        ))
    }
}
