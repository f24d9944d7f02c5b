//! Per-cell terrain, resource and combustion data

use crate::core_types::{CombustionState, TerrainClass, Vec2};
use serde::{Deserialize, Serialize};

/// Maximum trees a single cell can hold
pub const MAX_TREES: u8 = 3;

/// Resources destroyed when a cell bursts into flame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Destruction {
    pub trees: u8,
    pub building: bool,
}

impl Destruction {
    /// Nothing was destroyed
    pub fn is_empty(&self) -> bool {
        self.trees == 0 && !self.building
    }
}

/// A single landscape cell.
///
/// Static fields (elevation, terrain, moisture, wind) are fixed at creation.
/// Everything else mutates during an episode. Cells are plain values addressed
/// by their index in [`ResourceGrid`](crate::grid::ResourceGrid).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Normalized terrain elevation
    pub(crate) elevation: f32,
    /// Land-cover class
    pub(crate) terrain: TerrainClass,
    /// Static fuel moisture
    pub(crate) moisture: f32,
    /// Static local wind vector
    pub(crate) wind: Vec2,
    /// Ticks until a sprayed cell dries (0 = dry)
    pub(crate) wetness: u16,
    /// Trees standing on the cell (0-3)
    pub(crate) trees: u8,
    /// Whether a building stands on the cell
    pub(crate) building: bool,
    pub(crate) state: CombustionState,
    /// Completed ticks spent in `state`
    pub(crate) ticks_in_state: u16,
}

impl Cell {
    /// Create a cell using the terrain table defaults.
    ///
    /// Building cells carry no trees.
    pub fn new(
        terrain: TerrainClass,
        elevation: f32,
        moisture: f32,
        wind: Vec2,
        building: bool,
    ) -> Self {
        Cell {
            elevation,
            terrain,
            moisture,
            wind,
            wetness: 0,
            trees: if building { 0 } else { terrain.tree_count() },
            building,
            state: terrain.default_state(),
            ticks_in_state: 0,
        }
    }

    /// Move to a new combustion state and restart its timer
    #[inline]
    pub(crate) fn enter(&mut self, state: CombustionState) {
        self.state = state;
        self.ticks_in_state = 0;
    }

    /// Whether this cell can ever carry fire
    pub fn is_flammable(&self) -> bool {
        self.terrain.is_flammable() || self.building
    }

    /// Burn away trees and building, returning what was lost
    pub(crate) fn destroy_resources(&mut self) -> Destruction {
        debug_assert!(self.trees <= MAX_TREES, "tree count out of range: {}", self.trees);
        let destruction = Destruction {
            trees: self.trees,
            building: self.building,
        };
        self.trees = 0;
        self.building = false;
        destruction
    }

    /// Remove up to `amount` trees, returning how many were removed
    pub(crate) fn remove_trees(&mut self, amount: u8) -> u8 {
        let removed = amount.min(self.trees);
        self.trees -= removed;
        removed
    }

    /// Get terrain elevation
    pub fn elevation(&self) -> f32 {
        self.elevation
    }

    /// Get land-cover class
    pub fn terrain(&self) -> TerrainClass {
        self.terrain
    }

    /// Get static fuel moisture
    pub fn moisture(&self) -> f32 {
        self.moisture
    }

    /// Get static wind vector - returns reference for zero-copy access
    pub fn wind(&self) -> &Vec2 {
        &self.wind
    }

    /// Get remaining wet ticks
    pub fn wetness(&self) -> u16 {
        self.wetness
    }

    /// Check if cell is currently wet
    pub fn is_wet(&self) -> bool {
        self.wetness > 0
    }

    /// Get tree count (0-3)
    pub fn trees(&self) -> u8 {
        self.trees
    }

    /// Check if a building stands on this cell
    pub fn has_building(&self) -> bool {
        self.building
    }

    /// Get combustion state
    pub fn state(&self) -> CombustionState {
        self.state
    }

    /// Get completed ticks in the current combustion state
    pub fn ticks_in_state(&self) -> u16 {
        self.ticks_in_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_defaults() {
        let forest = Cell::new(TerrainClass::DenseForest, 0.0, 0.5, Vec2::zeros(), false);
        assert_eq!(forest.trees(), 3);
        assert_eq!(forest.state(), CombustionState::Burnable);

        let house = Cell::new(TerrainClass::DenseForest, 0.0, 0.5, Vec2::zeros(), true);
        assert_eq!(house.trees(), 0);
        assert!(house.has_building());

        let lake = Cell::new(TerrainClass::Water, 0.0, 0.5, Vec2::zeros(), false);
        assert_eq!(lake.state(), CombustionState::NotBurnable);
        assert!(!lake.is_flammable());
    }

    #[test]
    fn test_remove_trees_never_underflows() {
        let mut cell = Cell::new(TerrainClass::MediumForest, 0.0, 0.5, Vec2::zeros(), false);
        assert_eq!(cell.remove_trees(1), 1);
        assert_eq!(cell.remove_trees(5), 1);
        assert_eq!(cell.remove_trees(1), 0);
        assert_eq!(cell.trees(), 0);
    }

    #[test]
    fn test_destroy_resources() {
        let mut cell = Cell::new(TerrainClass::Rocks, 0.0, 0.5, Vec2::zeros(), true);
        let lost = cell.destroy_resources();
        assert!(lost.building);
        assert_eq!(lost.trees, 0);
        assert!(!cell.has_building());
        assert!(cell.destroy_resources().is_empty());
    }
}
