//! Water spraying and drying
//!
//! A spray covers the cells within `radius` of the nozzle cell whose offset lies
//! within `cone_angle` degrees of the aim direction. Burning cells in the cone
//! are put out. Every other covered cell is soaked for the drying duration.

use crate::core_types::{CombustionState, Vec2};
use crate::grid::ResourceGrid;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Spray geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SprayPattern {
    /// Reach in cells
    pub radius: f32,
    /// Half-width of the cone in degrees (180 or more covers a full circle)
    pub cone_angle: f32,
}

impl SprayPattern {
    /// Ground crew hose
    pub const HOSE: SprayPattern = SprayPattern {
        radius: 3.0,
        cone_angle: 60.0,
    };

    /// Helicopter bucket drop
    pub const AERIAL_DROP: SprayPattern = SprayPattern {
        radius: 4.5,
        cone_angle: 360.0,
    };
}

/// Cells affected by one spray
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SprayOutcome {
    /// Burning cells forced to fully-extinguished
    pub extinguished: Vec<usize>,
    /// Cells soaked (or re-soaked)
    pub wetted: Vec<usize>,
}

impl SprayOutcome {
    /// Whether the spray touched no cell
    pub fn is_empty(&self) -> bool {
        self.extinguished.is_empty() && self.wetted.is_empty()
    }
}

/// Signed angle in degrees from `from` to `to`, in (-180, 180].
///
/// Zero-length inputs yield 0.
pub fn signed_angle(from: &Vec2, to: &Vec2) -> f32 {
    let cross = from.x * to.y - from.y * to.x;
    cross.atan2(from.dot(to)).to_degrees()
}

/// Indices covered by a spray centered on `(x, y)`, in row-major order
pub fn spray_cells(grid: &ResourceGrid, x: i32, y: i32, pattern: SprayPattern, aim: &Vec2) -> Vec<usize> {
    // `as` saturates huge radii; clipping happens in i64 so the bounds never overflow
    let reach = i64::from(pattern.radius.max(0.0).floor() as i32);
    let (x0, x1) = clip_span(i64::from(x), reach, grid.width());
    let (y0, y1) = clip_span(i64::from(y), reach, grid.height());
    let mut cells = Vec::new();

    for cy in y0..=y1 {
        for cx in x0..=x1 {
            let offset = Vec2::new(
                (i64::from(cx) - i64::from(x)) as f32,
                (i64::from(cy) - i64::from(y)) as f32,
            );
            if offset.norm() > pattern.radius {
                continue;
            }
            if signed_angle(&offset, aim).abs() > pattern.cone_angle {
                continue;
            }
            cells.push(grid.index(cx as usize, cy as usize));
        }
    }
    cells
}

/// Inclusive `[center - reach, center + reach]` clipped to `[0, len)`.
///
/// Empty (`start > end`) when the span misses the grid entirely.
fn clip_span(center: i64, reach: i64, len: usize) -> (i32, i32) {
    let last = len as i64 - 1;
    let start = (center - reach).max(0);
    let end = (center + reach).min(last);
    if start > end {
        (1, 0)
    } else {
        (start as i32, end as i32)
    }
}

/// Put out burning cells and soak the rest of the sprayed region.
///
/// Soaked cells get `drying_ticks` of wetness (refreshed, never stacked) and
/// are tracked in `wet` until they dry.
pub fn extinguish_region(
    grid: &mut ResourceGrid,
    wet: &mut FxHashSet<usize>,
    x: i32,
    y: i32,
    pattern: SprayPattern,
    aim: &Vec2,
    drying_ticks: u16,
) -> SprayOutcome {
    let mut outcome = SprayOutcome::default();

    for idx in spray_cells(grid, x, y, pattern, aim) {
        let cell = &mut grid.cells[idx];
        if cell.state.is_burning() {
            cell.enter(CombustionState::FullyExtinguished);
            outcome.extinguished.push(idx);
        } else {
            cell.wetness = drying_ticks;
            wet.insert(idx);
            outcome.wetted.push(idx);
        }
    }
    outcome
}

/// Decrement wetness of every tracked cell, returning the cells that dried out
pub fn dry_cells(grid: &mut ResourceGrid, wet: &mut FxHashSet<usize>) -> Vec<usize> {
    let mut dried = Vec::new();
    wet.retain(|&idx| {
        let cell = &mut grid.cells[idx];
        cell.wetness = cell.wetness.saturating_sub(1);
        if cell.wetness == 0 {
            dried.push(idx);
            false
        } else {
            true
        }
    });
    dried.sort_unstable();
    dried
}
