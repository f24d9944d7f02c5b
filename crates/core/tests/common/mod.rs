//! Shared helpers for integration tests
#![allow(dead_code)]

use tracing_subscriber::EnvFilter;
use wildfire_sim_core::{
    Role, SimulationConfig, SpreadConfig, TerrainClass, TerrainMaps, WildfireSimulation,
};

/// Install a test-writer subscriber once per test binary (`RUST_LOG=debug` to see ticks)
#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Flat, calm, dry dense forest
pub fn forest_maps(size: usize) -> TerrainMaps {
    TerrainMaps::uniform(size, size, TerrainClass::DenseForest)
}

/// Config whose calm, dry spread ratio (1.0) clears the ignition threshold
pub fn doubled_base_rate_config() -> SimulationConfig {
    SimulationConfig {
        spread: SpreadConfig {
            base_rate: 2.0,
            ..SpreadConfig::default()
        },
        ..SimulationConfig::default()
    }
}

pub fn authority(maps: &TerrainMaps, config: SimulationConfig) -> WildfireSimulation {
    WildfireSimulation::new(maps, config, Role::Authority).expect("valid terrain")
}

pub fn follower(maps: &TerrainMaps, config: SimulationConfig) -> WildfireSimulation {
    WildfireSimulation::new(maps, config, Role::Follower).expect("valid terrain")
}
