//! Accumulative partial observation
//!
//! Every viewer reveals a square neighborhood around itself. Revealed cells are
//! classified into small integer codes and merged into a persistent composite
//! map that agents and the overhead "fog of war" read from. The composite only
//! ever grows: cells leave the unobserved state and keep their last seen code
//! until a viewer sees them again.
//!
//! # Classification codes
//!
//! | code  | meaning                              |
//! |-------|--------------------------------------|
//! | 0     | never observed                       |
//! | 1-4   | wet, 0-3 trees                       |
//! | 5-8   | dry, 0-3 trees                       |
//! | 9     | ignited                              |
//! | 10    | on fire                              |
//! | 11    | extinguishing                        |
//! | 12    | fully extinguished                   |
//! | 13    | water                                |
//! | 14    | building                             |
//! | 15    | civilian                             |
//!
//! Civilian beats building beats combustion state beats land cover.

use crate::core_types::{CombustionState, TerrainClass, ViewerId};
use crate::grid::ResourceGrid;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

pub const UNOBSERVED: u8 = 0;
pub const WET_BASE: u8 = 1;
pub const DRY_BASE: u8 = 5;
pub const IGNITED: u8 = 9;
pub const ON_FIRE: u8 = 10;
pub const EXTINGUISHING: u8 = 11;
pub const FULLY_EXTINGUISHED: u8 = 12;
pub const WATER: u8 = 13;
pub const BUILDING: u8 = 14;
pub const CIVILIAN: u8 = 15;

/// Sensor window entries (61 x 61) handed to learning agents
pub const DEFAULT_SENSOR_CAPACITY: usize = 61 * 61;

/// Sensor padding past the end of a viewer's window
pub const SENSOR_PADDING: i32 = -1;

/// Actor class of a viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewerKind {
    Firefighter,
    Bulldozer,
    Drone,
    Helicopter,
}

impl ViewerKind {
    /// Convert from u8 for FFI compatibility
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ViewerKind::Firefighter),
            1 => Some(ViewerKind::Bulldozer),
            2 => Some(ViewerKind::Drone),
            3 => Some(ViewerKind::Helicopter),
            _ => None,
        }
    }

    /// Convert to u8 for FFI compatibility
    pub fn as_u8(&self) -> u8 {
        match self {
            ViewerKind::Firefighter => 0,
            ViewerKind::Bulldozer => 1,
            ViewerKind::Drone => 2,
            ViewerKind::Helicopter => 3,
        }
    }

    /// Half-width of the square revealed into the composite map
    pub fn view_radius(&self) -> u32 {
        match self {
            ViewerKind::Firefighter | ViewerKind::Bulldozer => 5,
            ViewerKind::Drone => 15,
            ViewerKind::Helicopter => 20,
        }
    }

    /// Half-width of the sensor window read back by an agent
    pub fn window_radius(&self) -> u32 {
        match self {
            ViewerKind::Firefighter | ViewerKind::Bulldozer => 10,
            ViewerKind::Drone => 25,
            ViewerKind::Helicopter => 30,
        }
    }

    /// Chunks kept loaded around the viewer
    pub fn chunk_radius(&self) -> u32 {
        match self {
            ViewerKind::Firefighter | ViewerKind::Bulldozer => 3,
            ViewerKind::Drone => 7,
            ViewerKind::Helicopter => 6,
        }
    }
}

/// Classify one in-bounds cell as an overhead sensor would see it
pub fn local_view(grid: &ResourceGrid, civilians: &FxHashSet<usize>, x: usize, y: usize) -> u8 {
    let idx = grid.index(x, y);
    if civilians.contains(&idx) {
        return CIVILIAN;
    }

    let cell = &grid.cells()[idx];
    if cell.has_building() {
        return BUILDING;
    }
    match cell.state() {
        CombustionState::Ignited => IGNITED,
        CombustionState::OnFire => ON_FIRE,
        CombustionState::Extinguishing => EXTINGUISHING,
        CombustionState::FullyExtinguished => FULLY_EXTINGUISHED,
        CombustionState::Burnable | CombustionState::NotBurnable => {
            if cell.terrain() == TerrainClass::Water {
                WATER
            } else if cell.is_wet() {
                WET_BASE + cell.trees()
            } else {
                DRY_BASE + cell.trees()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ViewerPose {
    kind: ViewerKind,
    x: usize,
    y: usize,
}

/// Shared composite map built from every viewer's local view
#[derive(Debug, Clone)]
pub struct ObservationAggregator {
    width: usize,
    height: usize,
    composite: Vec<u8>,
    viewers: FxHashMap<ViewerId, ViewerPose>,
    dirty: bool,
    last_refresh_tick: Option<u64>,
}

impl ObservationAggregator {
    pub fn new(width: usize, height: usize) -> Self {
        ObservationAggregator {
            width,
            height,
            composite: vec![UNOBSERVED; width * height],
            viewers: FxHashMap::default(),
            dirty: false,
            last_refresh_tick: None,
        }
    }

    /// Place or move a viewer; only a real change marks the map dirty
    pub fn upsert_viewer(&mut self, id: ViewerId, kind: ViewerKind, x: usize, y: usize) {
        let pose = ViewerPose { kind, x, y };
        if self.viewers.insert(id, pose) != Some(pose) {
            self.dirty = true;
        }
    }

    /// Forget a viewer. Cells it revealed stay revealed.
    pub fn remove_viewer(&mut self, id: ViewerId) -> bool {
        self.viewers.remove(&id).is_some()
    }

    pub fn viewer_count(&self) -> usize {
        self.viewers.len()
    }

    /// Request a refresh (grid content changed)
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Merge every viewer's local view into the composite.
    ///
    /// Runs at most once per `tick` and only when dirty; returns whether it ran.
    /// With no viewers there is nothing to merge and the dirty flag is kept.
    pub fn refresh_if_dirty(
        &mut self,
        grid: &ResourceGrid,
        civilians: &FxHashSet<usize>,
        tick: u64,
    ) -> bool {
        if !self.dirty || self.viewers.is_empty() || self.last_refresh_tick == Some(tick) {
            return false;
        }

        for pose in self.viewers.values() {
            let r = pose.kind.view_radius() as usize;
            let x0 = pose.x.saturating_sub(r);
            let y0 = pose.y.saturating_sub(r);
            let x1 = (pose.x + r).min(self.width - 1);
            let y1 = (pose.y + r).min(self.height - 1);
            for y in y0..=y1 {
                for x in x0..=x1 {
                    self.composite[y * self.width + x] = local_view(grid, civilians, x, y);
                }
            }
        }

        self.dirty = false;
        self.last_refresh_tick = Some(tick);
        true
    }

    /// Composite codes in row-major order
    pub fn composite(&self) -> &[u8] {
        &self.composite
    }

    /// Composite code at (x, y); unobserved outside the map
    pub fn composite_at(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return UNOBSERVED;
        }
        self.composite[y as usize * self.width + x as usize]
    }

    /// Number of cells revealed so far
    pub fn observed_count(&self) -> usize {
        self.composite.iter().filter(|&&c| c != UNOBSERVED).count()
    }

    /// Flattened square window of composite codes around (x, y).
    ///
    /// Rows run top to bottom, cells outside the map read 0, and the result is
    /// padded with -1 (or truncated) to exactly `capacity` entries.
    pub fn sensor_window(&self, x: i32, y: i32, radius: u32, capacity: usize) -> Vec<i32> {
        let r = i64::from(radius);
        let (cx, cy) = (i64::from(x), i64::from(y));
        let mut window = Vec::with_capacity(capacity);
        'rows: for wy in cy - r..=cy + r {
            for wx in cx - r..=cx + r {
                if window.len() == capacity {
                    break 'rows;
                }
                let code = match (i32::try_from(wx), i32::try_from(wy)) {
                    (Ok(wx), Ok(wy)) => self.composite_at(wx, wy),
                    _ => UNOBSERVED,
                };
                window.push(i32::from(code));
            }
        }
        window.resize(capacity, SENSOR_PADDING);
        window
    }
}
