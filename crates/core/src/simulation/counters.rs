//! Destroyed-resource bookkeeping

use serde::{Deserialize, Serialize};

/// Penalty weight of one destroyed building relative to one tree
pub const BUILDING_WEIGHT: u64 = 10;
/// Penalty weight of one civilian casualty relative to one tree
pub const CIVILIAN_WEIGHT: u64 = 100;

/// Monotonic destruction counters for one episode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DestructionCounters {
    pub trees: u64,
    pub buildings: u64,
    pub civilians: u64,
}

impl DestructionCounters {
    pub fn add_trees(&mut self, count: u64) {
        self.trees += count;
    }

    pub fn add_buildings(&mut self, count: u64) {
        self.buildings += count;
    }

    pub fn add_civilians(&mut self, count: u64) {
        self.civilians += count;
    }

    /// Weighted damage: trees + 10 x buildings + 100 x civilians
    pub fn damage_score(&self) -> u64 {
        self.trees + BUILDING_WEIGHT * self.buildings + CIVILIAN_WEIGHT * self.civilians
    }

    /// Whether every counter is at least as large as in `earlier`
    pub fn dominates(&self, earlier: &DestructionCounters) -> bool {
        self.trees >= earlier.trees
            && self.buildings >= earlier.buildings
            && self.civilians >= earlier.civilians
    }
}
