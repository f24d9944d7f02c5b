//! End-to-end fire behavior on small landscapes
//!
//! Covers spread from a single ignition, the timed combustion stages, border
//! cells, cutting fire breaks and spraying water.

mod common;

use common::{authority, forest_maps, doubled_base_rate_config};
use wildfire_sim_core::grid::NEIGHBOR_OFFSETS;
use wildfire_sim_core::observation::{DRY_BASE, FULLY_EXTINGUISHED, WET_BASE};
use wildfire_sim_core::{
    CombustionState, SimulationConfig, SprayPattern, TerrainClass, TerrainMaps, Vec2, ViewerKind,
};

/// At the default R0 of 1.0, calm dry flat ground scores exactly the lower
/// threshold (0.5), which does not exceed it.
#[test]
fn default_base_rate_holds_fire_on_calm_flat_ground() {
    let maps = forest_maps(20);
    let mut sim = authority(&maps, SimulationConfig::default());
    assert!(sim.ignite(10, 10));
    for _ in 0..3 {
        sim.advance_tick();
    }
    for &(dx, dy) in &NEIGHBOR_OFFSETS {
        assert_eq!(
            sim.grid().cell(10 + dx, 10 + dy).unwrap().state(),
            CombustionState::Burnable
        );
    }
}

#[test]
fn single_ignition_with_doubled_base_rate_reaches_all_neighbors_in_three_ticks() {
    let maps = forest_maps(20);
    let mut sim = authority(&maps, doubled_base_rate_config());
    let initial_trees = sim.grid().total_trees();

    assert!(sim.ignite(10, 10));
    let mut last = sim.counters();
    for _ in 0..3 {
        sim.advance_tick();
        assert!(sim.counters().trees >= last.trees);
        last = sim.counters();
    }

    for &(dx, dy) in &NEIGHBOR_OFFSETS {
        let state = sim.grid().cell(10 + dx, 10 + dy).unwrap().state();
        assert!(
            matches!(state, CombustionState::Ignited | CombustionState::OnFire),
            "neighbor ({dx}, {dy}) is {state:?}"
        );
    }
    assert_eq!(sim.counters().trees, 3);
    assert_eq!(sim.grid().total_trees() + sim.counters().trees, initial_trees);
}

#[test]
fn destroyed_trees_match_burnt_cells() {
    let maps = forest_maps(20);
    let mut sim = authority(&maps, doubled_base_rate_config());
    sim.ignite(10, 10);

    let mut last = 0;
    for _ in 0..12 {
        let report = sim.advance_tick();
        assert!(sim.counters().trees >= last);
        assert_eq!(sim.counters().trees - last, report.destroyed.trees);
        last = sim.counters().trees;

        let burnt = sim
            .grid()
            .cells()
            .iter()
            .filter(|c| {
                matches!(
                    c.state(),
                    CombustionState::OnFire
                        | CombustionState::Extinguishing
                        | CombustionState::FullyExtinguished
                )
            })
            .count() as u64;
        assert_eq!(sim.counters().trees, 3 * burnt);
        assert!(sim.grid().cells().iter().all(|c| c.trees() <= 3));
    }
}

#[test]
fn ignition_timeline_with_default_extinguishing() {
    let maps = forest_maps(20);
    let mut sim = authority(&maps, SimulationConfig::default());
    sim.ignite(10, 10);
    let state = |sim: &wildfire_sim_core::WildfireSimulation| sim.grid().cell(10, 10).unwrap().state();

    sim.advance_tick();
    assert_eq!(state(&sim), CombustionState::Ignited);
    sim.advance_tick();
    assert_eq!(state(&sim), CombustionState::OnFire);
    sim.advance_tick();
    assert_eq!(state(&sim), CombustionState::Extinguishing);
    assert!(!sim.is_burning());

    while sim.tick() < 17 {
        sim.advance_tick();
    }
    assert_eq!(state(&sim), CombustionState::Extinguishing);
    sim.advance_tick();
    assert_eq!(sim.tick(), 18);
    assert_eq!(state(&sim), CombustionState::FullyExtinguished);
    assert!(!sim.ignite(10, 10));
}

#[test]
fn border_cells_never_combust() {
    let maps = forest_maps(12);
    let config = SimulationConfig {
        spread: wildfire_sim_core::SpreadConfig {
            base_rate: 20.0,
            ..Default::default()
        },
        ..SimulationConfig::default()
    };
    let mut sim = authority(&maps, config);
    assert!(!sim.ignite(0, 0));
    assert!(!sim.ignite(11, 4));
    assert!(sim.ignite(1, 1));

    for _ in 0..40 {
        sim.advance_tick();
    }
    let grid = sim.grid();
    for y in 0..12 {
        for x in 0..12 {
            let state = grid.cell(x, y).unwrap().state();
            if grid.is_interior(x, y) {
                assert_eq!(state, CombustionState::FullyExtinguished);
            } else {
                assert_eq!(state, CombustionState::Burnable);
            }
        }
    }
}

#[test]
fn water_and_rock_never_burn() {
    let mut maps = forest_maps(10);
    maps.set_class(5, 5, TerrainClass::Water);
    maps.set_class(5, 4, TerrainClass::Rocks);
    let mut sim = authority(&maps, doubled_base_rate_config());

    assert!(!sim.ignite(5, 5));
    assert!(sim.ignite(4, 4));
    for _ in 0..30 {
        sim.advance_tick();
    }
    assert_eq!(
        sim.grid().cell(5, 5).unwrap().state(),
        CombustionState::NotBurnable
    );
    assert_eq!(
        sim.grid().cell(5, 4).unwrap().state(),
        CombustionState::NotBurnable
    );
}

#[test]
fn buildings_burn_and_count() {
    let mut maps = TerrainMaps::uniform(12, 12, TerrainClass::Brush);
    maps.place_building(6, 6);
    let mut sim = authority(&maps, doubled_base_rate_config());

    // Brush next to the building is burnable, far brush is not
    assert_eq!(
        sim.grid().cell(4, 6).unwrap().state(),
        CombustionState::Burnable
    );
    assert_eq!(
        sim.grid().cell(1, 1).unwrap().state(),
        CombustionState::NotBurnable
    );

    assert!(sim.ignite(5, 6));
    for _ in 0..6 {
        sim.advance_tick();
    }
    assert_eq!(sim.counters().buildings, 1);
    assert!(!sim.grid().cell(6, 6).unwrap().has_building());
    assert_eq!(sim.damage_score(), 10);
}

#[test]
fn partial_cuts_build_a_fire_break() {
    let mut maps = forest_maps(10);
    maps.set_class(3, 3, TerrainClass::MediumForest);
    let mut sim = authority(&maps, SimulationConfig::default());

    assert_eq!(sim.grid().cell(3, 3).unwrap().trees(), 2);
    assert_eq!(sim.cut_resource(3, 3, false), 1);
    assert_eq!(sim.grid().cell(3, 3).unwrap().trees(), 1);
    assert_eq!(sim.cut_resource(3, 3, false), 1);
    assert_eq!(sim.cut_resource(3, 3, false), 0);

    let cell = sim.grid().cell(3, 3).unwrap();
    assert_eq!(cell.trees(), 0);
    assert_eq!(cell.state(), CombustionState::NotBurnable);
    assert_eq!(sim.counters().trees, 2);
    assert_eq!(sim.cut_resource(30, 3, true), 0);
}

#[test]
fn fire_break_stops_spread() {
    let maps = forest_maps(15);
    let mut sim = authority(&maps, doubled_base_rate_config());
    for y in 0..15 {
        sim.cut_resource(7, y, true);
    }
    sim.ignite(3, 7);
    for _ in 0..40 {
        sim.advance_tick();
    }
    for y in 1..14 {
        assert_eq!(
            sim.grid().cell(10, y).unwrap().state(),
            CombustionState::Burnable
        );
    }
    assert_eq!(
        sim.grid().cell(4, 7).unwrap().state(),
        CombustionState::FullyExtinguished
    );
}

#[test]
fn spraying_fire_extinguishes_immediately() {
    let maps = forest_maps(20);
    let mut sim = authority(&maps, SimulationConfig::default());
    sim.ignite(10, 10);
    sim.advance_tick();
    sim.advance_tick();
    assert_eq!(
        sim.grid().cell(10, 10).unwrap().state(),
        CombustionState::OnFire
    );

    let outcome = sim.spray_water(8, 10, SprayPattern::HOSE, Vec2::new(1.0, 0.0));
    assert!(outcome.extinguished.contains(&sim.grid().index(10, 10)));
    assert_eq!(
        sim.grid().cell(10, 10).unwrap().state(),
        CombustionState::FullyExtinguished
    );
    assert!(!sim.is_burning());
}

#[test]
fn sprayed_cell_dries_after_exact_duration() {
    let maps = forest_maps(20);
    let mut sim = authority(&maps, SimulationConfig::default());
    sim.move_viewer(1, ViewerKind::Firefighter, 5, 5);
    assert_eq!(sim.observation().composite_at(5, 5), DRY_BASE + 3);

    let aerial = SprayPattern::AERIAL_DROP;
    sim.spray_water(5, 5, aerial, Vec2::zeros());
    assert_eq!(sim.grid().cell(5, 5).unwrap().wetness(), 30);

    sim.advance_tick();
    assert_eq!(sim.observation().composite_at(5, 5), WET_BASE + 3);
    for _ in 1..29 {
        sim.advance_tick();
    }
    assert_eq!(sim.grid().cell(5, 5).unwrap().wetness(), 1);
    assert_eq!(sim.observation().composite_at(5, 5), WET_BASE + 3);

    sim.advance_tick();
    assert_eq!(sim.tick(), 30);
    assert!(!sim.grid().cell(5, 5).unwrap().is_wet());
    assert_eq!(sim.wet_cell_count(), 0);
    assert_eq!(sim.observation().composite_at(5, 5), DRY_BASE + 3);
}

#[test]
fn extinguished_cells_show_in_composite() {
    let maps = forest_maps(20);
    let mut sim = authority(&maps, SimulationConfig::default());
    sim.move_viewer(9, ViewerKind::Drone, 10, 10);
    sim.ignite(10, 10);
    sim.advance_tick();
    sim.advance_tick();
    sim.spray_water(10, 10, SprayPattern::HOSE, Vec2::zeros());
    sim.advance_tick();
    assert_eq!(sim.observation().composite_at(10, 10), FULLY_EXTINGUISHED);
}

#[test]
fn huge_spray_radius_covers_grid_without_overflow() {
    let maps = forest_maps(20);
    let mut sim = authority(&maps, SimulationConfig::default());
    sim.ignite(10, 10);
    sim.advance_tick();

    let flood = SprayPattern {
        radius: 1e10,
        cone_angle: 360.0,
    };
    let outcome = sim.spray_water(5, 5, flood, Vec2::zeros());
    assert_eq!(outcome.extinguished.len() + outcome.wetted.len(), 20 * 20);
    assert!(!sim.is_burning());

    let corner = sim.spray_water(19, 19, SprayPattern { radius: 1e5, ..flood }, Vec2::new(-1.0, 0.0));
    assert!(!corner.is_empty());
}
