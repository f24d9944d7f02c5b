//! Fire spread cellular automaton
//!
//! Each tick the engine gathers, for every interior cell, its next value from
//! the stable grid and the stable grid only. Next values are written into a
//! scratch buffer that is swapped with the grid when the pass completes, so the
//! result never depends on visit order and rows can be computed in parallel.
//!
//! # Timed transitions
//!
//! | state          | next tick                                         |
//! |----------------|---------------------------------------------------|
//! | burnable       | on-fire / ignited when an on-fire neighbor's ratio clears a threshold |
//! | ignited        | held one tick, then on-fire (resources destroyed) |
//! | on-fire        | extinguishing (after acting as a spread source)   |
//! | extinguishing  | fully-extinguished after `extinguishing_ticks`    |

pub mod ratio;

use crate::core_types::{CombustionState, Vec2};
use crate::grid::{Cell, Destruction, ResourceGrid, NEIGHBOR_OFFSETS};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_1_SQRT_2;

pub use ratio::{slope_degrees, slope_factor, spread_ratio, wind_alignment};

/// Spread model parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadConfig {
    /// Base spread rate R0
    pub base_rate: f32,
    /// Ratio above which a burnable neighbor becomes ignited
    pub ignition_threshold: f32,
    /// Ratio above which a burnable neighbor flashes straight to on-fire
    pub flashover_threshold: f32,
    /// Moisture at which spread stops entirely
    pub moisture_constant: f32,
    /// Moisture added to a wet target
    pub wet_moisture_bonus: f32,
    /// Elevation-difference scale used for slope (terrain height / cell size)
    pub slope_scale: f32,
    /// Exponential slope coefficient
    pub slope_coefficient: f32,
    /// Ticks spent extinguishing before a cell is fully extinguished
    pub extinguishing_ticks: u16,
}

impl Default for SpreadConfig {
    fn default() -> Self {
        SpreadConfig {
            base_rate: 1.0,
            ignition_threshold: 0.5,
            flashover_threshold: 8.0,
            moisture_constant: 10.0,
            wet_moisture_bonus: 5.0,
            slope_scale: 890.0 / 30.0,
            slope_coefficient: 0.069,
            extinguishing_ticks: 15,
        }
    }
}

/// Result of one automaton step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    /// Any cell ignited or on-fire after the step
    pub still_burning: bool,
    pub trees_destroyed: u64,
    pub buildings_destroyed: u64,
    /// Indices of cells whose resources burned this step, ascending
    pub destroyed_cells: Vec<usize>,
}

/// Unit vector pointing from the neighbor at `(dx, dy)` back toward the center cell
#[inline]
fn direction_from_neighbor(dx: i32, dy: i32) -> Vec2 {
    let scale = if dx != 0 && dy != 0 { FRAC_1_SQRT_2 } else { 1.0 };
    Vec2::new(-dx as f32 * scale, -dy as f32 * scale)
}

/// Double-buffered spread engine
pub struct FireSpreadEngine {
    config: SpreadConfig,
    /// Scratch grid written during a step, swapped in at the end
    next: Vec<Cell>,
}

impl FireSpreadEngine {
    pub fn new(config: SpreadConfig) -> Self {
        FireSpreadEngine {
            config,
            next: Vec::new(),
        }
    }

    /// Get spread configuration
    pub fn config(&self) -> &SpreadConfig {
        &self.config
    }

    /// Highest spread ratio any on-fire neighbor exerts on the interior cell at `(x, y)`
    pub fn exposure(&self, grid: &ResourceGrid, x: usize, y: usize) -> f32 {
        exposure(&grid.cells, grid.width, x, y, &self.config)
    }

    /// Advance every interior cell by one tick.
    ///
    /// Border cells are copied through unchanged and therefore never combust.
    pub fn advance(&mut self, grid: &mut ResourceGrid) -> TickOutcome {
        let width = grid.width;
        let height = grid.height;
        let config = &self.config;

        self.next.clone_from(&grid.cells);
        let current = &grid.cells;

        let destroyed_rows: Vec<Vec<(usize, Destruction)>> = self
            .next
            .par_chunks_mut(width)
            .enumerate()
            .map(|(y, row)| {
                let mut destroyed = Vec::new();
                if y == 0 || y + 1 >= height {
                    return destroyed;
                }
                for x in 1..width.saturating_sub(1) {
                    if let Some(lost) = step_cell(current, width, x, y, &mut row[x], config) {
                        destroyed.push((y * width + x, lost));
                    }
                }
                destroyed
            })
            .collect();

        std::mem::swap(&mut grid.cells, &mut self.next);

        let mut outcome = TickOutcome {
            still_burning: grid.cells.par_iter().any(|c| c.state.is_actively_burning()),
            ..TickOutcome::default()
        };
        for (idx, lost) in destroyed_rows.into_iter().flatten() {
            outcome.trees_destroyed += u64::from(lost.trees);
            outcome.buildings_destroyed += u64::from(lost.building);
            outcome.destroyed_cells.push(idx);
        }
        outcome
    }
}

fn exposure(cells: &[Cell], width: usize, x: usize, y: usize, config: &SpreadConfig) -> f32 {
    let target = &cells[y * width + x];
    let mut max_ratio = 0.0_f32;
    for &(dx, dy) in &NEIGHBOR_OFFSETS {
        let nx = (x as i32 + dx) as usize;
        let ny = (y as i32 + dy) as usize;
        let source = &cells[ny * width + nx];
        if source.state != CombustionState::OnFire {
            continue;
        }
        let ratio = spread_ratio(source, target, &direction_from_neighbor(dx, dy), config);
        max_ratio = max_ratio.max(ratio);
    }
    max_ratio
}

/// Compute the next value of one interior cell into `next`.
///
/// Returns the resources lost when the cell bursts into flame this step.
fn step_cell(
    current: &[Cell],
    width: usize,
    x: usize,
    y: usize,
    next: &mut Cell,
    config: &SpreadConfig,
) -> Option<Destruction> {
    match current[y * width + x].state {
        CombustionState::NotBurnable | CombustionState::FullyExtinguished => None,
        CombustionState::Burnable => {
            let ratio = exposure(current, width, x, y, config);
            if ratio > config.flashover_threshold {
                next.enter(CombustionState::OnFire);
                Some(next.destroy_resources())
            } else {
                if ratio > config.ignition_threshold {
                    next.enter(CombustionState::Ignited);
                }
                None
            }
        }
        CombustionState::Ignited => {
            if next.ticks_in_state >= 1 {
                next.enter(CombustionState::OnFire);
                Some(next.destroy_resources())
            } else {
                next.ticks_in_state += 1;
                None
            }
        }
        CombustionState::OnFire => {
            next.enter(CombustionState::Extinguishing);
            None
        }
        CombustionState::Extinguishing => {
            next.ticks_in_state = next.ticks_in_state.saturating_add(1);
            if next.ticks_in_state >= config.extinguishing_ticks {
                next.enter(CombustionState::FullyExtinguished);
            }
            None
        }
    }
}
