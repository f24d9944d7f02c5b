//! Authority/follower replication through the action log

mod common;

use common::{authority, follower, forest_maps, doubled_base_rate_config};
use wildfire_sim_core::simulation::replay::catch_up;
use wildfire_sim_core::{
    ActionRecord, ReplayError, SprayPattern, TerrainClass, TerrainMaps, Vec2, ViewerKind,
    WildfireSimulation,
};

/// Mixed landscape with a hill, wind, moisture and a few houses
fn varied_maps() -> TerrainMaps {
    let mut maps = TerrainMaps::single_hill(40, 40, TerrainClass::DenseForest, 0.3, 10.0)
        .with_uniform_wind(Vec2::new(1.5, -0.5))
        .with_uniform_moisture(1.0);
    for y in 0..40 {
        for x in 0..40 {
            let bucket = ((x * 7 + y * 3) % 5) as u8;
            maps.set_class(x, y, TerrainClass::from_density_bucket(bucket));
        }
    }
    maps.set_class(20, 20, TerrainClass::Water);
    maps.place_building(12, 25);
    maps.place_building(30, 12);
    maps
}

/// Scripted episode exercising every intent
fn run_episode(sim: &mut WildfireSimulation) {
    sim.spawn_civilians(14, 24, 4);
    sim.ignite(12, 20);
    sim.ignite(27, 10);
    sim.false_ignite(0.8, 0.8);
    sim.move_viewer(1, ViewerKind::Helicopter, 20, 20);

    for tick in 0..60 {
        if tick % 7 == 3 {
            sim.cut_resource(15 + tick % 5, 18, tick % 2 == 0);
        }
        if tick % 11 == 5 {
            sim.spray_water(12, 22, SprayPattern::HOSE, Vec2::new(0.0, 1.0));
        }
        if tick == 20 {
            sim.spray_water(28, 12, SprayPattern::AERIAL_DROP, Vec2::zeros());
            sim.ignite(7, 5);
        }
        sim.advance_tick();
    }
}

fn assert_same_state(a: &WildfireSimulation, b: &WildfireSimulation) {
    assert_eq!(a.grid().states(), b.grid().states());
    assert_eq!(a.grid(), b.grid());
    assert_eq!(a.counters(), b.counters());
    assert_eq!(a.tick(), b.tick());
    assert_eq!(a.civilians(), b.civilians());
    assert_eq!(a.fingerprint(), b.fingerprint());
}

#[test]
fn follower_catches_up_from_full_log() {
    let maps = varied_maps();
    let mut leader = authority(&maps, doubled_base_rate_config());
    run_episode(&mut leader);
    assert!(leader.counters().trees > 0);

    let replica = catch_up(&maps, doubled_base_rate_config(), leader.log().entries()).unwrap();
    assert_same_state(&leader, &replica);
    assert!(replica.verify_fingerprint(leader.fingerprint()).is_ok());
    assert_eq!(replica.log().len(), leader.log().len());
}

#[test]
fn follower_streams_wire_frames_incrementally() {
    let maps = varied_maps();
    let mut leader = authority(&maps, doubled_base_rate_config());
    let mut replica = follower(&maps, doubled_base_rate_config());
    let mut cursor = 0;

    for round in 0..5 {
        leader.ignite(8 + round * 5, 30);
        for _ in 0..6 {
            leader.advance_tick();
        }
        leader.cut_resource(3, 3 + round, false);

        let frames = leader.log().wire_frames_since(cursor);
        cursor = leader.log().len();
        replica.replay_wire(&frames).unwrap();
        assert_same_state(&leader, &replica);
    }
}

#[test]
fn identical_runs_are_identical() {
    let maps = varied_maps();
    let mut a = authority(&maps, doubled_base_rate_config());
    let mut b = authority(&maps, doubled_base_rate_config());
    run_episode(&mut a);
    run_episode(&mut b);
    assert_same_state(&a, &b);
}

#[test]
fn different_seed_only_changes_civilians() {
    let maps = forest_maps(30);
    let mut config = doubled_base_rate_config();
    let mut a = authority(&maps, config.clone());
    config.seed = 99;
    let mut b = authority(&maps, config);

    for sim in [&mut a, &mut b] {
        sim.spawn_civilians(15, 15, 6);
        for _ in 0..20 {
            sim.advance_tick();
        }
    }
    assert_eq!(a.grid(), b.grid());
    assert_ne!(a.civilians(), b.civilians());
}

#[test]
fn viewers_do_not_affect_replication() {
    let maps = forest_maps(30);
    let mut a = authority(&maps, doubled_base_rate_config());
    let mut b = authority(&maps, doubled_base_rate_config());
    a.move_viewer(4, ViewerKind::Drone, 10, 10);

    for sim in [&mut a, &mut b] {
        sim.ignite(15, 15);
        for _ in 0..5 {
            sim.advance_tick();
        }
    }
    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_eq!(a.log().entries(), b.log().entries());
}

#[test]
fn malformed_frame_is_fatal() {
    let maps = forest_maps(20);
    let mut replica = follower(&maps, doubled_base_rate_config());
    let frames: Vec<Vec<f32>> = vec![
        ActionRecord::Ignite { x: 10, y: 10 }.to_wire(),
        vec![4.0, 1.0, 2.0],
    ];
    assert!(matches!(
        replica.replay_wire(&frames),
        Err(ReplayError::WrongArity { expected: 6, actual: 2, .. })
    ));
    assert_eq!(replica.tick(), 0);
    assert!(!replica.is_burning());
}

#[test]
fn replayed_huge_spray_matches_authority() {
    let maps = forest_maps(20);
    let mut leader = authority(&maps, doubled_base_rate_config());
    let mut replica = follower(&maps, doubled_base_rate_config());

    leader.ignite(10, 10);
    leader.advance_tick();
    leader.spray_water(
        5,
        5,
        SprayPattern {
            radius: 3e9,
            cone_angle: 360.0,
        },
        Vec2::zeros(),
    );
    leader.advance_tick();

    let frames = leader.log().wire_frames_since(0);
    assert_eq!(replica.replay_wire(&frames).unwrap(), 4);
    assert_same_state(&leader, &replica);
    assert_eq!(replica.wet_cell_count(), 20 * 20 - 1);
}

#[test]
fn oversized_civilian_spawn_frame_is_refused() {
    let maps = forest_maps(20);
    let mut leader = authority(&maps, doubled_base_rate_config());
    let mut replica = follower(&maps, doubled_base_rate_config());

    assert_eq!(leader.spawn_civilians(3, 3, 4_000_000_000), 0);
    assert_eq!(leader.spawn_civilians(3, 3, 2), 2);

    let frames = vec![vec![5.0_f32, 3.0, 3.0, 4.0e9], vec![5.0, 3.0, 3.0, 2.0]];
    assert_eq!(replica.replay_wire(&frames).unwrap(), 2);
    assert_eq!(replica.civilians().len(), 2);
    assert_same_state(&leader, &replica);
}
