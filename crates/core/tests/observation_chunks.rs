//! Viewer-driven chunk loading and the accumulative observation map

mod common;

use common::{authority, forest_maps, doubled_base_rate_config};
use wildfire_sim_core::observation::{
    local_view, BUILDING, CIVILIAN, DEFAULT_SENSOR_CAPACITY, DRY_BASE, IGNITED, UNOBSERVED,
};
use wildfire_sim_core::{ChunkEvent, SimulationConfig, TerrainClass, TerrainMaps, ViewerKind};

#[test]
fn cutting_refreshes_loaded_chunk() {
    let maps = forest_maps(50);
    let mut sim = authority(&maps, SimulationConfig::default());
    sim.move_viewer(1, ViewerKind::Firefighter, 5, 5);
    let loaded = sim.drain_chunk_events();
    assert!(loaded.contains(&ChunkEvent::Loaded { cx: 0, cy: 0 }));
    assert_eq!(sim.chunks().instances(0, 0).len(), 100);

    sim.cut_resource(2, 2, true);
    assert_eq!(
        sim.drain_chunk_events(),
        vec![ChunkEvent::Refreshed { cx: 0, cy: 0 }]
    );
    assert_eq!(sim.chunks().instances(0, 0).len(), 99);

    // Chunk (4, 4) is beyond the firefighter's chunk radius of 3
    assert!(!sim.chunks().is_loaded(4, 4));
    sim.cut_resource(45, 45, true);
    assert!(sim.drain_chunk_events().is_empty());
}

#[test]
fn burning_invalidates_chunks_each_tick() {
    let maps = forest_maps(30);
    let mut sim = authority(&maps, doubled_base_rate_config());
    sim.move_viewer(2, ViewerKind::Drone, 15, 15);
    sim.drain_chunk_events();

    sim.ignite(15, 15);
    sim.advance_tick();
    assert!(sim.drain_chunk_events().is_empty());
    sim.advance_tick();
    assert_eq!(
        sim.drain_chunk_events(),
        vec![ChunkEvent::Refreshed { cx: 1, cy: 1 }]
    );
    assert!(sim
        .chunks()
        .instances(1, 1)
        .iter()
        .all(|r| (r.x, r.y) != (15, 15)));
}

#[test]
fn viewer_moving_across_map_keeps_revealed_cells() {
    let maps = forest_maps(60);
    let mut sim = authority(&maps, doubled_base_rate_config());
    sim.move_viewer(3, ViewerKind::Firefighter, 10, 10);
    let first = sim.observation().observed_count();
    assert_eq!(first, 121);

    sim.advance_tick();
    sim.move_viewer(3, ViewerKind::Firefighter, 40, 40);
    assert_eq!(sim.observation().observed_count(), first);
    sim.advance_tick();
    assert_eq!(sim.observation().observed_count(), 2 * first);
    assert_eq!(sim.observation().composite_at(10, 10), DRY_BASE + 3);
    assert_eq!(sim.observation().composite_at(25, 25), UNOBSERVED);

    // Far jump leaves the old chunk neighborhood
    assert!(!sim.chunks().is_loaded(1, 1));
    assert!(sim.chunks().is_loaded(4, 4));
}

#[test]
fn stale_fire_stays_in_composite_until_seen_again() {
    let maps = forest_maps(40);
    let mut sim = authority(&maps, SimulationConfig::default());
    sim.ignite(10, 10);
    sim.advance_tick();
    sim.advance_tick();
    sim.move_viewer(1, ViewerKind::Bulldozer, 10, 10);
    sim.advance_tick();
    assert_eq!(sim.observation().composite_at(10, 10), 11);

    sim.move_viewer(1, ViewerKind::Bulldozer, 30, 30);
    for _ in 0..20 {
        sim.advance_tick();
    }
    // Fully extinguished now, but nobody is looking
    assert_eq!(sim.observation().composite_at(10, 10), 11);
}

#[test]
fn civilians_and_buildings_surface_first() {
    let mut maps = TerrainMaps::uniform(20, 20, TerrainClass::LightForest);
    maps.place_building(5, 5);
    let mut sim = authority(&maps, SimulationConfig {
        civilian_move_interval: 0,
        ..SimulationConfig::default()
    });
    sim.spawn_civilians(8, 8, 1);
    sim.move_viewer(1, ViewerKind::Helicopter, 10, 10);

    assert_eq!(sim.observation().composite_at(5, 5), BUILDING);
    assert_eq!(sim.observation().composite_at(8, 8), CIVILIAN);
    assert_eq!(sim.observation().composite_at(2, 2), DRY_BASE + 1);
}

#[test]
fn sensor_window_matches_composite() {
    let maps = forest_maps(40);
    let mut sim = authority(&maps, doubled_base_rate_config());
    sim.move_viewer(1, ViewerKind::Firefighter, 3, 3);
    sim.ignite(3, 3);
    sim.advance_tick();
    sim.advance_tick();
    sim.advance_tick();

    let kind = ViewerKind::Firefighter;
    let window = sim
        .observation()
        .sensor_window(3, 3, kind.window_radius(), DEFAULT_SENSOR_CAPACITY);
    assert_eq!(window.len(), DEFAULT_SENSOR_CAPACITY);

    let side = 2 * kind.window_radius() as usize + 1;
    let center = (side / 2) * side + side / 2;
    assert_eq!(window[center], i32::from(sim.observation().composite_at(3, 3)));
    assert_eq!(window[0], 0);
    assert_eq!(window[side * side - 1], 0);
    assert!(window[side * side..].iter().all(|&v| v == -1));

    // Fire reached the neighbor this tick and the viewer saw it
    let civilians = Default::default();
    assert_eq!(local_view(sim.grid(), &civilians, 3, 4), IGNITED);
    assert_eq!(sim.observation().composite_at(3, 4), IGNITED);
}
