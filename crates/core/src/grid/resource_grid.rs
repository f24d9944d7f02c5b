//! Static-shape, mutable-content landscape grid
//!
//! Cells live in one flat row-major `Vec` (`[y * width + x]`). The grid is sized
//! once from the terrain maps and never resized.

use crate::core_types::{CombustionState, Vec2};
use crate::grid::{Cell, TerrainError, TerrainMaps};
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// 8-neighborhood offsets, clockwise from north-west
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
];

/// Rectangular grid of cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceGrid {
    pub(crate) width: usize,
    pub(crate) height: usize,
    /// Cells in row-major order: [y * width + x]
    pub(crate) cells: Vec<Cell>,
}

impl ResourceGrid {
    /// Build the grid from validated terrain maps.
    ///
    /// Flammable cells within `vulnerability_range` of a building start burnable.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError`] when the maps are inconsistent.
    pub fn from_terrain(maps: &TerrainMaps, vulnerability_range: usize) -> Result<Self, TerrainError> {
        maps.validate()?;

        let vulnerable = maps.vulnerability_mask(vulnerability_range);
        let cells = (0..maps.width * maps.height)
            .map(|i| {
                let mut cell = Cell::new(
                    maps.vegetation[i],
                    maps.elevation[i],
                    maps.moisture[i],
                    Vec2::new(maps.wind_x[i], maps.wind_y[i]),
                    maps.buildings[i],
                );
                if vulnerable[i] && cell.is_flammable() {
                    cell.state = CombustionState::Burnable;
                }
                cell
            })
            .collect();

        Ok(ResourceGrid {
            width: maps.width,
            height: maps.height,
            cells,
        })
    }

    /// Grid width in cells
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells
    pub fn height(&self) -> usize {
        self.height
    }

    /// All cells in row-major order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Get cell index from (x, y)
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Get (x, y) from a cell index
    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    /// Whether signed coordinates fall inside the grid
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Whether the coordinates name a simulated (non-border) cell
    #[inline]
    pub fn is_interior(&self, x: i32, y: i32) -> bool {
        x >= 1 && y >= 1 && (x as usize) + 1 < self.width && (y as usize) + 1 < self.height
    }

    /// Get cell at signed coordinates (bounds-checked)
    pub fn cell(&self, x: i32, y: i32) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x as usize, y as usize)])
        } else {
            None
        }
    }

    /// Get mutable cell at signed coordinates (bounds-checked)
    pub fn cell_mut(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        if self.in_bounds(x, y) {
            let idx = self.index(x as usize, y as usize);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    /// Combustion state of every cell
    pub fn states(&self) -> Vec<CombustionState> {
        self.cells.iter().map(Cell::state).collect()
    }

    /// Count cells in a given state
    pub fn count_state(&self, state: CombustionState) -> usize {
        self.cells.iter().filter(|c| c.state == state).count()
    }

    /// Total trees still standing
    pub fn total_trees(&self) -> u64 {
        self.cells.iter().map(|c| u64::from(c.trees)).sum()
    }

    /// Hash of every mutable cell field.
    ///
    /// Two replicas that applied the same action log report the same value.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.width.hash(&mut hasher);
        self.height.hash(&mut hasher);
        for cell in &self.cells {
            cell.state.hash(&mut hasher);
            cell.ticks_in_state.hash(&mut hasher);
            cell.trees.hash(&mut hasher);
            cell.building.hash(&mut hasher);
            cell.wetness.hash(&mut hasher);
        }
        hasher.finish()
    }
}
