//! Simulation configuration

use crate::spread::SpreadConfig;
use serde::{Deserialize, Serialize};

/// Session-wide settings fixed at episode setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Spread model parameters
    pub spread: SpreadConfig,
    /// Side length of a visibility chunk in cells
    pub chunk_size: usize,
    /// Ticks a sprayed cell stays wet
    pub drying_ticks: u16,
    /// Ticks a cosmetic false-fire marker lives
    pub false_fire_ticks: u16,
    /// Dilation passes marking flammable cells around buildings burnable
    pub building_vulnerability_range: usize,
    /// Civilians take a step every this many ticks (0 disables movement)
    pub civilian_move_interval: u64,
    /// Seed for the civilian random walk
    pub seed: u64,
    /// Civilians an episode may ever spawn; larger spawns are refused whole
    pub max_civilians: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            spread: SpreadConfig::default(),
            chunk_size: 10,
            drying_ticks: 30,
            false_fire_ticks: 30,
            building_vulnerability_range: 2,
            civilian_move_interval: 1,
            seed: 0,
            max_civilians: 1024,
        }
    }
}
