//! End-to-end loot sorting: a scheduler drives `ACT_MOVE_LOOT` against a
//! `GridWorld` until the actor runs out of work.

use drudge_core::activities::{MoveLoot, Travel};
use drudge_core::app::{EngineBuilder, RunReport, SavedTasks, Scheduler};
use drudge_core::domain::{Actor, EndReason, EngineConfig, Item, NpcMission, Tripoint, Volume};
use drudge_core::impls::GridWorld;
use drudge_core::ports::zones::{LOOT_CUSTOM, LOOT_UNSORTED};
use drudge_core::ports::{CargoRef, ItemLocation, Zone};
use drudge_core::typed::{Activity, Task};
use rstest::rstest;

const SRC: Tripoint = Tripoint::new(60, 60, 0);
const DEST: Tripoint = Tripoint::new(61, 61, 0);
const CART: CargoRef = CargoRef { vehicle: 1, part: 0 };

fn pt(x: i32, y: i32) -> Tripoint {
    Tripoint::new(x, y, 0)
}

fn bottle() -> Item {
    Item::new("bottle_plastic", Volume::ml(250))
}

fn world() -> GridWorld {
    GridWorld::new(200, 200)
}

fn unsorted(world: &mut GridWorld, start: Tripoint, end: Tripoint) -> usize {
    world.add_zone(Zone::new("Loot:Unsorted", LOOT_UNSORTED, start, end))
}

fn custom(world: &mut GridWorld, name: &str, start: Tripoint, end: Tripoint) -> usize {
    world.add_zone(Zone::new(name, LOOT_CUSTOM, start, end))
}

fn fill(world: &mut GridWorld, start: Tripoint, end: Tripoint, item: &Item, per_tile: usize) {
    for p in Zone::new("fill", LOOT_UNSORTED, start, end).tiles() {
        world.add_ground_items(p, item, per_tile);
    }
}

/// Ground items named `name` over the rectangle `start..=end`.
fn on_ground(world: &GridWorld, start: Tripoint, end: Tripoint, name: &str) -> u32 {
    Zone::new("count", LOOT_CUSTOM, start, end)
        .tiles()
        .map(|p| world.count_named(ItemLocation::Ground(p), name))
        .sum()
}

fn in_cargo(world: &GridWorld, cargo: CargoRef, name: &str) -> u32 {
    world.count_named(ItemLocation::Cargo(cargo), name)
}

fn sort_with(world: &mut GridWorld, actor: &mut Actor, config: EngineConfig) -> RunReport {
    let mut scheduler = Scheduler::with_seed(config, 7);
    scheduler.assign(actor, world, Task::new(MoveLoot::new()));
    let report = scheduler.run_until_idle(actor, world, 5_000);
    assert!(report.idle, "sorting did not settle: {report:?}");
    report
}

fn sort(world: &mut GridWorld, actor: &mut Actor) -> RunReport {
    sort_with(world, actor, EngineConfig::default())
}

fn texts(world: &GridWorld) -> Vec<String> {
    world.messages().iter().map(|m| m.text.clone()).collect()
}

#[test]
fn adjacent_source_is_emptied_into_the_custom_zone() {
    let mut world = world();
    unsorted(&mut world, SRC, SRC);
    fill(&mut world, SRC, SRC, &bottle(), 10);
    custom(&mut world, "Loot:Custom", DEST, DEST);
    let mut actor = Actor::avatar("You", DEST);

    let report = sort(&mut world, &mut actor);

    assert_eq!(on_ground(&world, SRC, SRC, "bottle_plastic"), 0);
    assert_eq!(on_ground(&world, DEST, DEST, "bottle_plastic"), 10);
    assert_eq!(report.ends.first().map(|e| e.reason), Some(EndReason::Finished));
    assert!(texts(&world).contains(&"You sorted out every item possible.".to_string()));
    assert_eq!(actor.pos, DEST);
}

#[test]
fn actor_walks_to_a_distant_source_and_back() {
    let mut world = world();
    unsorted(&mut world, SRC, SRC);
    fill(&mut world, SRC, SRC, &bottle(), 10);
    custom(&mut world, "Loot:Custom", DEST, DEST);
    let home = pt(70, 70);
    let mut actor = Actor::avatar("You", home);

    let report = sort(&mut world, &mut actor);

    assert_eq!(on_ground(&world, DEST, DEST, "bottle_plastic"), 10);
    assert!(actor.pos.is_adjacent_or_at(home));
    let kinds: Vec<_> = report.ends.iter().map(|e| e.kind.as_str()).collect();
    assert_eq!(kinds, vec![Travel::KIND, MoveLoot::KIND, Travel::KIND]);
    assert!(actor.backlog.is_empty());
}

#[test]
fn source_out_of_the_actors_range_is_left_alone() {
    let mut world = world();
    unsorted(&mut world, SRC, SRC);
    fill(&mut world, SRC, SRC, &bottle(), 10);
    custom(&mut world, "Loot:Custom", DEST, DEST);
    let mut actor = Actor::avatar("You", pt(130, 130));

    sort(&mut world, &mut actor);

    assert_eq!(on_ground(&world, SRC, SRC, "bottle_plastic"), 10);
    assert_eq!(on_ground(&world, DEST, DEST, "bottle_plastic"), 0);
    assert_eq!(actor.pos, pt(130, 130));
}

#[test]
fn destination_out_of_the_sources_range_is_not_used() {
    let mut world = world();
    unsorted(&mut world, SRC, SRC);
    fill(&mut world, SRC, SRC, &bottle(), 10);
    let far = pt(125, 125);
    custom(&mut world, "Loot:Custom", far, far);
    let mut actor = Actor::avatar("You", SRC);

    sort(&mut world, &mut actor);

    assert_eq!(on_ground(&world, SRC, SRC, "bottle_plastic"), 10);
    assert_eq!(on_ground(&world, far, far, "bottle_plastic"), 0);
}

#[rstest]
#[case::first_zone_wins(false, 10, 0)]
#[case::swapped_priority(true, 0, 10)]
fn zone_order_decides_between_catch_all_zones(
    #[case] swap: bool,
    #[case] in_first: u32,
    #[case] in_second: u32,
) {
    let mut world = world();
    unsorted(&mut world, SRC, SRC);
    fill(&mut world, SRC, SRC, &bottle(), 10);
    let first_tile = pt(62, 62);
    let second_tile = pt(63, 63);
    let first = custom(&mut world, "Loot:Custom1", first_tile, first_tile);
    let second = custom(&mut world, "Loot:Custom2", second_tile, second_tile);
    if swap {
        world.swap_zones(first, second);
    }
    let mut actor = Actor::avatar("You", SRC);

    sort(&mut world, &mut actor);

    assert_eq!(on_ground(&world, first_tile, first_tile, "bottle_plastic"), in_first);
    assert_eq!(on_ground(&world, second_tile, second_tile, "bottle_plastic"), in_second);
}

#[test]
fn filtered_zone_beats_a_catch_all_zone() {
    let mut world = world();
    unsorted(&mut world, SRC, SRC);
    fill(&mut world, SRC, SRC, &bottle(), 10);
    fill(&mut world, SRC, SRC, &Item::new("rock", Volume::ml(500)), 3);
    let catch_all = pt(62, 62);
    let bottles = pt(63, 63);
    custom(&mut world, "Loot:Custom1", catch_all, catch_all);
    world.add_zone(Zone::new("Loot:Custom2", LOOT_CUSTOM, bottles, bottles).with_filter("bottle"));
    let mut actor = Actor::avatar("You", SRC);

    sort(&mut world, &mut actor);

    assert_eq!(on_ground(&world, bottles, bottles, "bottle_plastic"), 10);
    assert_eq!(on_ground(&world, catch_all, catch_all, "bottle_plastic"), 0);
    assert_eq!(on_ground(&world, catch_all, catch_all, "rock"), 3);
}

#[test]
fn four_by_four_source_fills_a_four_by_four_destination() {
    let mut world = world();
    let (src_start, src_end) = (pt(60, 60), pt(63, 63));
    let (dest_start, dest_end) = (pt(66, 60), pt(69, 63));
    unsorted(&mut world, src_start, src_end);
    fill(&mut world, src_start, src_end, &bottle(), 10);
    custom(&mut world, "Loot:Custom", dest_start, dest_end);
    let mut actor = Actor::avatar("You", pt(64, 64));

    sort(&mut world, &mut actor);

    assert_eq!(on_ground(&world, src_start, src_end, "bottle_plastic"), 0);
    assert_eq!(on_ground(&world, dest_start, dest_end, "bottle_plastic"), 160);
}

#[test]
fn categories_find_their_zones_and_fall_back() {
    let mut world = world();
    unsorted(&mut world, SRC, SRC);
    let shirt = Item::new("dress shirt", Volume::ml(750)).with_category("clothing");
    let jacket = Item::new("flame-resistant jacket", Volume::ml(1500)).with_category("fclothing");
    let soda = Item::new("cola", Volume::ml(250)).with_category("drink");
    let spoiled = Item::new("apple", Volume::ml(250)).with_category("food");
    fill(&mut world, SRC, SRC, &shirt, 2);
    fill(&mut world, SRC, SRC, &jacket, 2);
    fill(&mut world, SRC, SRC, &soda, 2);
    fill(&mut world, SRC, SRC, &spoiled, 2);
    let clothing = pt(62, 60);
    let food = pt(63, 60);
    world.add_zone(Zone::new("Loot:Clothing", "LOOT_CLOTHING", clothing, clothing));
    world.add_zone(Zone::new("Loot:Food", "LOOT_FOOD", food, food));
    let mut actor = Actor::avatar("You", SRC);

    sort(&mut world, &mut actor);

    assert_eq!(on_ground(&world, clothing, clothing, "dress shirt"), 2);
    assert_eq!(on_ground(&world, clothing, clothing, "flame-resistant jacket"), 2);
    assert_eq!(on_ground(&world, food, food, "cola"), 2);
    assert_eq!(on_ground(&world, food, food, "apple"), 2);
    assert!(world.items_at(SRC).is_empty());
}

#[test]
fn liquids_and_guarded_favorites_stay_put() {
    let mut world = world();
    unsorted(&mut world, SRC, SRC);
    world.add_zone(Zone::new(
        "Loot:Favorites",
        drudge_core::ports::zones::LOOT_IGNORE_FAVORITES,
        SRC,
        SRC,
    ));
    fill(&mut world, SRC, SRC, &bottle(), 2);
    fill(&mut world, SRC, SRC, &Item::new("water", Volume::ml(250)).as_liquid(), 1);
    fill(&mut world, SRC, SRC, &Item::new("lucky coin", Volume::ml(5)).as_favorite(), 1);
    custom(&mut world, "Loot:Custom", DEST, DEST);
    let mut actor = Actor::avatar("You", SRC);

    sort(&mut world, &mut actor);

    assert_eq!(on_ground(&world, DEST, DEST, "bottle_plastic"), 2);
    assert_eq!(on_ground(&world, SRC, SRC, "water"), 1);
    assert_eq!(on_ground(&world, SRC, SRC, "lucky coin"), 1);
}

#[test]
fn cargo_destination_takes_what_fits_and_never_the_ground_beneath() {
    let mut world = world();
    unsorted(&mut world, SRC, SRC);
    fill(&mut world, SRC, SRC, &bottle(), 500);
    world.add_cargo(CART, DEST, Volume::liters(50));
    let mut zone = Zone::new("Loot:Custom", LOOT_CUSTOM, DEST, DEST);
    zone.vehicle = Some(CART.vehicle);
    world.add_zone(zone);
    let mut actor = Actor::avatar("You", SRC);

    sort(&mut world, &mut actor);

    assert_eq!(on_ground(&world, SRC, SRC, "bottle_plastic"), 300);
    assert_eq!(in_cargo(&world, CART, "bottle_plastic"), 200);
    assert_eq!(on_ground(&world, DEST, DEST, "bottle_plastic"), 0);
    assert!(texts(&world).contains(
        &"You can't move some items to the destination zone. No available destination point."
            .to_string()
    ));
}

#[test]
fn broken_cargo_destination_accepts_nothing() {
    let mut world = world();
    unsorted(&mut world, SRC, SRC);
    fill(&mut world, SRC, SRC, &bottle(), 500);
    world.add_cargo(CART, DEST, Volume::liters(50));
    world.break_cargo(CART);
    custom(&mut world, "Loot:Custom", DEST, DEST);
    let mut actor = Actor::avatar("You", SRC);

    sort(&mut world, &mut actor);

    assert_eq!(on_ground(&world, SRC, SRC, "bottle_plastic"), 500);
    assert_eq!(in_cargo(&world, CART, "bottle_plastic"), 0);
    assert_eq!(on_ground(&world, DEST, DEST, "bottle_plastic"), 0);
}

#[test]
fn zone_follows_a_moved_vehicle() {
    let mut world = world();
    unsorted(&mut world, SRC, SRC);
    fill(&mut world, SRC, SRC, &bottle(), 500);
    world.add_cargo(CART, DEST, Volume::liters(50));
    let mut zone = Zone::new("Loot:Custom", LOOT_CUSTOM, DEST, DEST);
    zone.vehicle = Some(CART.vehicle);
    world.add_zone(zone);
    world.move_vehicle(CART.vehicle, Tripoint::new(10, 0, 0));
    let mut actor = Actor::avatar("You", SRC);

    sort(&mut world, &mut actor);

    assert_eq!(world.cargo_part(CART).map(|part| part.pos), Some(pt(71, 61)));
    assert_eq!(on_ground(&world, SRC, SRC, "bottle_plastic"), 300);
    assert_eq!(in_cargo(&world, CART, "bottle_plastic"), 200);
    assert_eq!(on_ground(&world, DEST, DEST, "bottle_plastic"), 0);
}

#[rstest]
#[case::intact(false)]
#[case::broken(true)]
fn cargo_source_is_emptied_with_the_ground(#[case] broken: bool) {
    let mut world = world();
    world.add_cargo(CART, SRC, Volume::liters(50));
    for _ in 0..200 {
        world.add_cargo_item(CART, bottle());
    }
    fill(&mut world, SRC, SRC, &bottle(), 300);
    if broken {
        world.break_cargo(CART);
    }
    let mut zone = Zone::new("Loot:Unsorted", LOOT_UNSORTED, SRC, SRC);
    zone.vehicle = Some(CART.vehicle);
    world.add_zone(zone);
    custom(&mut world, "Loot:Custom", DEST, DEST);
    let mut actor = Actor::avatar("You", SRC);

    sort(&mut world, &mut actor);

    assert_eq!(in_cargo(&world, CART, "bottle_plastic"), 0);
    assert_eq!(on_ground(&world, SRC, SRC, "bottle_plastic"), 0);
    assert_eq!(on_ground(&world, DEST, DEST, "bottle_plastic"), 500);
}

#[test]
fn full_tiles_are_passed_over_until_none_is_left() {
    let mut world = world();
    unsorted(&mut world, SRC, SRC);
    fill(&mut world, SRC, SRC, &bottle(), 12);
    let (dest_start, dest_end) = (pt(62, 60), pt(63, 60));
    custom(&mut world, "Loot:Custom", dest_start, dest_end);
    let mut actor = Actor::avatar("You", SRC);
    let config = EngineConfig {
        max_items_per_tile: 5,
        ..EngineConfig::default()
    };

    sort_with(&mut world, &mut actor, config);

    assert_eq!(world.items_at(dest_start).len(), 5);
    assert_eq!(world.items_at(dest_end).len(), 5);
    assert_eq!(on_ground(&world, SRC, SRC, "bottle_plastic"), 2);
}

#[test]
fn second_run_changes_nothing() {
    let mut world = world();
    unsorted(&mut world, SRC, SRC);
    fill(&mut world, SRC, SRC, &bottle(), 10);
    custom(&mut world, "Loot:Custom", DEST, DEST);
    let mut actor = Actor::avatar("You", SRC);

    sort(&mut world, &mut actor);
    let after_first = world.items_at(DEST).to_vec();
    world.take_messages();

    let report = sort(&mut world, &mut actor);
    assert_eq!(world.items_at(DEST), after_first.as_slice());
    assert_eq!(report.turns, 1);
    assert_eq!(texts(&world), vec!["You sorted out every item possible."]);
}

#[test]
fn walled_in_source_is_reported_once() {
    let mut world = world();
    let walled = pt(80, 60);
    unsorted(&mut world, SRC, SRC);
    unsorted(&mut world, walled, walled);
    fill(&mut world, SRC, SRC, &bottle(), 3);
    fill(&mut world, walled, walled, &bottle(), 3);
    for p in walled.neighbours() {
        world.set_wall(p);
    }
    custom(&mut world, "Loot:Custom", DEST, DEST);
    let mut actor = Actor::avatar("You", SRC);

    sort(&mut world, &mut actor);

    assert_eq!(on_ground(&world, DEST, DEST, "bottle_plastic"), 3);
    assert_eq!(on_ground(&world, walled, walled, "bottle_plastic"), 3);
    let unreachable: Vec<_> = texts(&world)
        .into_iter()
        .filter(|text| text.contains("can't reach the source tile"))
        .collect();
    assert_eq!(
        unreachable,
        vec!["You can't reach the source tile at 20E from the start point. Try to sort out loot without a cart."]
    );
}

#[test]
fn npc_sorts_then_returns_to_its_mission() {
    let mut world = world();
    unsorted(&mut world, SRC, SRC);
    fill(&mut world, SRC, SRC, &bottle(), 4);
    custom(&mut world, "Loot:Custom", DEST, DEST);
    let home = pt(66, 66);
    let mut npc = Actor::npc("Ruby", home);
    npc.mission = NpcMission::Guard;

    sort(&mut world, &mut npc);

    assert_eq!(on_ground(&world, DEST, DEST, "bottle_plastic"), 4);
    assert_eq!(npc.mission, NpcMission::Guard);
    assert!(npc.pos.is_adjacent_or_at(SRC));
    assert!(texts(&world).contains(&"Ruby sorted out every item possible.".to_string()));
}

#[test]
fn saved_mid_walk_sort_resumes_after_loading() {
    let mut world = world();
    unsorted(&mut world, SRC, SRC);
    fill(&mut world, SRC, SRC, &bottle(), 10);
    custom(&mut world, "Loot:Custom", DEST, DEST);
    let mut engine = EngineBuilder::new().seed(3).build().expect("engine");
    let mut actor = Actor::avatar("You", pt(75, 60));

    engine
        .scheduler
        .assign(&mut actor, &mut world, Task::new(MoveLoot::new()));
    for _ in 0..3 {
        engine.scheduler.process_turn(&mut actor, &mut world);
    }
    assert_eq!(actor.activity.as_ref().map(Task::kind), Some(Travel::KIND));
    assert_eq!(actor.backlog.front().map(Task::kind), Some(MoveLoot::KIND));

    let saved = engine.save_tasks(&actor).expect("save");
    let text = serde_json::to_string(&saved).expect("serialize");
    let restored: SavedTasks = serde_json::from_str(&text).expect("deserialize");
    let mut reloaded = Actor::avatar("You", actor.pos);
    engine.load_tasks(&mut reloaded, &restored);

    let report = engine.scheduler.run_until_idle(&mut reloaded, &mut world, 5_000);
    assert!(report.idle);
    assert_eq!(on_ground(&world, DEST, DEST, "bottle_plastic"), 10);
    assert_eq!(on_ground(&world, SRC, SRC, "bottle_plastic"), 0);
}

#[test]
fn saved_half_sorted_tile_finishes_after_loading() {
    let mut world = world();
    unsorted(&mut world, SRC, SRC);
    fill(&mut world, SRC, SRC, &bottle(), 10);
    custom(&mut world, "Loot:Custom", DEST, DEST);
    let mut engine = EngineBuilder::new().seed(3).build().expect("engine");
    let mut actor = Actor::avatar("You", SRC);

    engine
        .scheduler
        .assign(&mut actor, &mut world, Task::new(MoveLoot::new()));
    for _ in 0..4 {
        engine.scheduler.process_turn(&mut actor, &mut world);
    }
    let moved = on_ground(&world, DEST, DEST, "bottle_plastic");
    assert!((1..10).contains(&moved), "moved {moved}");
    let sorting = actor
        .activity
        .as_ref()
        .and_then(|task| task.downcast_ref::<MoveLoot>())
        .expect("still sorting");
    assert_eq!(sorting.current_tile_item_cache().len(), 10 - moved as usize);

    let saved = engine.save_tasks(&actor).expect("save");
    let mut reloaded = Actor::avatar("You", SRC);
    engine.load_tasks(&mut reloaded, &saved);
    engine.scheduler.run_until_idle(&mut reloaded, &mut world, 5_000);

    assert_eq!(on_ground(&world, DEST, DEST, "bottle_plastic"), 10);
}

#[test]
fn demo_scenario_sorts_as_laid_out() {
    let scenario = drudge_core::impls::Scenario::from_json(include_str!("../../../demos/sort.json"))
        .expect("demo parses");
    let engine = EngineBuilder::new().build().expect("engine");
    let loaded = scenario.load(&engine.registry).expect("demo loads");
    let (mut world, mut actor) = (loaded.world, loaded.actor);
    let mut scheduler = Scheduler::with_seed(EngineConfig::default(), 7);
    scheduler.assign(&mut actor, &mut world, loaded.task.expect("demo task"));

    assert!(scheduler.run_until_idle(&mut actor, &mut world, 5_000).idle);

    assert_eq!(on_ground(&world, pt(15, 2), pt(16, 2), "dress shirt"), 3);
    assert_eq!(on_ground(&world, pt(15, 4), pt(15, 4), "cola"), 4);
    assert_eq!(on_ground(&world, pt(18, 2), pt(18, 2), "hammer"), 1);
    assert_eq!(in_cargo(&world, CART, "rock"), 6);
    assert_eq!(in_cargo(&world, CART, "plank"), 2);
    assert_eq!(on_ground(&world, pt(20, 12), pt(20, 12), "plank"), 2);
    assert_eq!(on_ground(&world, pt(5, 4), pt(5, 4), "water"), 1);
    assert_eq!(on_ground(&world, pt(6, 3), pt(6, 3), "charcoal"), 5);
    assert!(actor.pos.is_adjacent_or_at(pt(2, 10)));
}
