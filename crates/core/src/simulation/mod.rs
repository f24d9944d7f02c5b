//! Wildfire simulation session
//!
//! `WildfireSimulation` owns one episode:
//! - Resource grid built from external terrain maps
//! - Double-buffered fire spread engine
//! - Destruction counters and civilians
//! - Chunk visibility and accumulative observation views
//! - Action log for deterministic replication to followers
//!
//! Every intent goes through one handler that both mutates the grid and
//! appends to the log, so a follower replaying the log runs exactly the code
//! the authority ran.

pub mod action_log;
pub mod civilians;
pub mod config;
pub mod counters;
pub mod replay;

pub use action_log::{ActionLog, ActionOpcode, ActionRecord};
pub use civilians::{Civilian, CivilianRoster};
pub use config::SimulationConfig;
pub use counters::DestructionCounters;
pub use replay::ReplayError;

use crate::core_types::{CombustionState, Vec2, ViewerId};
use crate::grid::{ResourceGrid, TerrainError, TerrainMaps};
use crate::observation::{ObservationAggregator, ViewerKind};
use crate::spread::FireSpreadEngine;
use crate::suppression::{cut_trees, dry_cells, extinguish_region, SprayOutcome, SprayPattern};
use crate::visibility::{ChunkEvent, ChunkVisibilityManager};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Replication role of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Decides intents and emits the action log
    Authority,
    /// Reconstructs state by replaying the authority's log
    Follower,
}

impl Role {
    /// Convert from u8 for FFI compatibility
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Role::Authority),
            1 => Some(Role::Follower),
            _ => None,
        }
    }

    /// Convert to u8 for FFI compatibility
    pub fn as_u8(&self) -> u8 {
        match self {
            Role::Authority => 0,
            Role::Follower => 1,
        }
    }
}

/// Cosmetic fire marker with no effect on combustion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FalseFire {
    pub x: usize,
    pub y: usize,
    /// Ticks left before the marker disappears
    pub remaining: u16,
}

/// Summary of one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Tick number after the step (first tick reports 1)
    pub tick: u64,
    /// Any cell ignited or on-fire
    pub still_burning: bool,
    /// Destruction caused during this tick only
    pub destroyed: DestructionCounters,
    /// Cells that dried out this tick
    pub dried_cells: usize,
}

/// Result of applying one action record
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    Ignite(bool),
    FalseIgnite(bool),
    Tick(TickReport),
    Cut(u8),
    Spray(SprayOutcome),
    SpawnCivilians(u32),
}

impl ActionOutcome {
    /// Whether the action changed anything
    pub fn succeeded(&self) -> bool {
        match self {
            ActionOutcome::Ignite(ok) | ActionOutcome::FalseIgnite(ok) => *ok,
            ActionOutcome::Tick(_) => true,
            ActionOutcome::Cut(removed) => *removed > 0,
            ActionOutcome::Spray(outcome) => !outcome.is_empty(),
            ActionOutcome::SpawnCivilians(count) => *count > 0,
        }
    }
}

/// One simulation episode
pub struct WildfireSimulation {
    config: SimulationConfig,
    role: Role,
    pub(crate) grid: ResourceGrid,
    engine: FireSpreadEngine,
    tick: u64,
    counters: DestructionCounters,
    still_burning: bool,

    /// Cells currently wet
    wet_cells: FxHashSet<usize>,
    false_fires: Vec<FalseFire>,
    civilians: CivilianRoster,

    chunks: ChunkVisibilityManager,
    observation: ObservationAggregator,
    log: ActionLog,
}

impl WildfireSimulation {
    /// Create a session from terrain maps
    ///
    /// # Arguments
    ///
    /// * `maps` - Static per-cell maps from the terrain generator
    /// * `config` - Episode settings
    /// * `role` - Authority or follower
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError`] when the maps are inconsistent.
    pub fn new(maps: &TerrainMaps, config: SimulationConfig, role: Role) -> Result<Self, TerrainError> {
        let grid = ResourceGrid::from_terrain(maps, config.building_vulnerability_range)?;
        let chunks = ChunkVisibilityManager::new(grid.width(), grid.height(), config.chunk_size);
        let (chunks_x, chunks_y) = chunks.dimensions();

        info!(
            "Wildfire simulation initialized: {}x{} grid, {}x{} chunks, role={:?}, burnable={}",
            grid.width(),
            grid.height(),
            chunks_x,
            chunks_y,
            role,
            grid.count_state(CombustionState::Burnable)
        );

        Ok(WildfireSimulation {
            observation: ObservationAggregator::new(grid.width(), grid.height()),
            engine: FireSpreadEngine::new(config.spread.clone()),
            civilians: CivilianRoster::new(config.seed),
            chunks,
            grid,
            config,
            role,
            tick: 0,
            counters: DestructionCounters::default(),
            still_burning: false,
            wet_cells: FxHashSet::default(),
            false_fires: Vec::new(),
            log: ActionLog::new(),
        })
    }

    // ========================================================================
    // Intents (each one is logged)
    // ========================================================================

    /// Apply a record through the same handler used for live intents
    pub fn apply(&mut self, record: &ActionRecord) -> ActionOutcome {
        match *record {
            ActionRecord::Ignite { x, y } => ActionOutcome::Ignite(self.ignite(x, y)),
            ActionRecord::FalseIgnite { x, y } => ActionOutcome::FalseIgnite(self.false_ignite(x, y)),
            ActionRecord::AdvanceTick => ActionOutcome::Tick(self.advance_tick()),
            ActionRecord::CutResource { x, y, full } => ActionOutcome::Cut(self.cut_resource(x, y, full)),
            ActionRecord::SprayWater {
                x,
                y,
                radius,
                cone_angle,
                aim_x,
                aim_y,
            } => ActionOutcome::Spray(self.spray_water(
                x,
                y,
                SprayPattern { radius, cone_angle },
                Vec2::new(aim_x, aim_y),
            )),
            ActionRecord::SpawnCivilians { x, y, count } => {
                ActionOutcome::SpawnCivilians(self.spawn_civilians(x, y, count))
            }
        }
    }

    /// Ignite the cell at (x, y)
    ///
    /// Succeeds on interior cells that are burnable or already burning; the
    /// cell restarts as ignited. Refusals are normal and return false.
    pub fn ignite(&mut self, x: i32, y: i32) -> bool {
        self.log.record(ActionRecord::Ignite { x, y });

        if !self.grid.is_interior(x, y) {
            debug!("Ignition refused at ({}, {}): border or outside grid", x, y);
            return false;
        }
        let Some(cell) = self.grid.cell_mut(x, y) else {
            return false;
        };
        match cell.state {
            CombustionState::Burnable
            | CombustionState::Ignited
            | CombustionState::OnFire
            | CombustionState::Extinguishing => {
                cell.enter(CombustionState::Ignited);
                self.still_burning = true;
                self.touch_observation();
                true
            }
            CombustionState::NotBurnable | CombustionState::FullyExtinguished => {
                debug!("Ignition refused at ({}, {}): cell is {:?}", x, y, cell.state);
                false
            }
        }
    }

    /// Spawn a cosmetic fire marker at normalized map coordinates
    ///
    /// Refused for coordinates outside `[0, 1)` and for cells that are burning
    /// or burnt out.
    pub fn false_ignite(&mut self, nx: f32, ny: f32) -> bool {
        self.log.record(ActionRecord::FalseIgnite { x: nx, y: ny });

        if !(0.0..1.0).contains(&nx) || !(0.0..1.0).contains(&ny) {
            debug!("False ignition refused at normalized ({}, {})", nx, ny);
            return false;
        }
        let x = ((nx * self.grid.width() as f32).floor() as usize).min(self.grid.width() - 1);
        let y = ((ny * self.grid.height() as f32).floor() as usize).min(self.grid.height() - 1);
        if !self.grid.cells()[self.grid.index(x, y)].state().is_quiescent() {
            return false;
        }

        self.false_fires.push(FalseFire {
            x,
            y,
            remaining: self.config.false_fire_ticks,
        });
        true
    }

    /// Run one tick
    ///
    /// Order: spread and swap, bookkeeping, drying, false-fire aging,
    /// civilians, then observation refresh.
    pub fn advance_tick(&mut self) -> TickReport {
        self.log.record(ActionRecord::AdvanceTick);
        let before = self.counters;

        // 1. Spread transition against the stable grid, then swap
        let outcome = self.engine.advance(&mut self.grid);
        self.still_burning = outcome.still_burning;

        // 2. Counters and chunk content
        self.counters.add_trees(outcome.trees_destroyed);
        self.counters.add_buildings(outcome.buildings_destroyed);
        for &idx in &outcome.destroyed_cells {
            let (x, y) = self.grid.coords(idx);
            self.chunks.invalidate_cell(x, y);
        }
        self.chunks.sync_invalidated(&self.grid);

        // 3. Drying
        let dried = dry_cells(&mut self.grid, &mut self.wet_cells);

        // 4. False fires age out
        for marker in &mut self.false_fires {
            marker.remaining = marker.remaining.saturating_sub(1);
        }
        self.false_fires.retain(|marker| marker.remaining > 0);

        // 5. Civilians
        let lost = self.civilians.check_casualties(&self.grid);
        self.counters.add_civilians(lost);
        let interval = self.config.civilian_move_interval;
        if interval > 0 && (self.tick + 1) % interval == 0 {
            self.civilians.wander(&self.grid);
        }

        // 6. Tick and observation
        self.tick += 1;
        self.touch_observation();

        debug_assert!(self.counters.dominates(&before), "destruction counters went backwards");
        let destroyed = DestructionCounters {
            trees: self.counters.trees - before.trees,
            buildings: self.counters.buildings - before.buildings,
            civilians: self.counters.civilians - before.civilians,
        };
        debug!(
            "Tick {}: burning={}, destroyed trees={} buildings={} civilians={}, dried={}",
            self.tick, self.still_burning, destroyed.trees, destroyed.buildings, destroyed.civilians,
            dried.len()
        );

        TickReport {
            tick: self.tick,
            still_burning: self.still_burning,
            destroyed,
            dried_cells: dried.len(),
        }
    }

    /// Cut one tree at (x, y), or every tree when `full`
    ///
    /// Returns the number of trees removed (0 for an empty or invalid cell).
    pub fn cut_resource(&mut self, x: i32, y: i32, full: bool) -> u8 {
        self.log.record(ActionRecord::CutResource { x, y, full });

        let removed = match self.grid.cell_mut(x, y) {
            Some(cell) => cut_trees(cell, full),
            None => 0,
        };
        if removed == 0 {
            debug!("Cut at ({}, {}) removed nothing", x, y);
            return 0;
        }

        self.counters.add_trees(u64::from(removed));
        self.chunks.invalidate_cell(x as usize, y as usize);
        self.chunks.sync_invalidated(&self.grid);
        self.touch_observation();
        removed
    }

    /// Spray water from (x, y) along `aim`
    ///
    /// # Arguments
    ///
    /// * `x`, `y` - Nozzle cell
    /// * `pattern` - Radius and cone half-angle (see [`SprayPattern::HOSE`])
    /// * `aim` - Aim direction; a zero vector sprays in every direction
    pub fn spray_water(&mut self, x: i32, y: i32, pattern: SprayPattern, aim: Vec2) -> SprayOutcome {
        self.log.record(ActionRecord::SprayWater {
            x,
            y,
            radius: pattern.radius,
            cone_angle: pattern.cone_angle,
            aim_x: aim.x,
            aim_y: aim.y,
        });

        let finite = pattern.radius.is_finite()
            && pattern.cone_angle.is_finite()
            && aim.x.is_finite()
            && aim.y.is_finite();
        if !finite || !self.grid.in_bounds(x, y) {
            debug!("Spray refused at ({}, {})", x, y);
            return SprayOutcome::default();
        }

        let outcome = extinguish_region(
            &mut self.grid,
            &mut self.wet_cells,
            x,
            y,
            pattern,
            &aim,
            self.config.drying_ticks,
        );
        if !outcome.extinguished.is_empty() {
            self.still_burning = self
                .grid
                .cells()
                .iter()
                .any(|c| c.state().is_actively_burning());
        }
        self.touch_observation();
        outcome
    }

    /// Place `count` civilians on cell (x, y), returning how many were placed
    ///
    /// A spawn that would take the episode past `max_civilians` is refused
    /// whole and places nobody.
    pub fn spawn_civilians(&mut self, x: i32, y: i32, count: u32) -> u32 {
        self.log.record(ActionRecord::SpawnCivilians { x, y, count });

        if count == 0 || !self.grid.in_bounds(x, y) {
            return 0;
        }
        let spawned = self.civilians.civilians().len() as u64;
        if spawned + u64::from(count) > u64::from(self.config.max_civilians) {
            debug!(
                "Spawn of {} civilians at ({}, {}) refused: {} of {} already spawned",
                count, x, y, spawned, self.config.max_civilians
            );
            return 0;
        }
        let first = self.civilians.spawn(x, y, count);
        info!("Spawned {} civilians at ({}, {}), ids {}..{}", count, x, y, first, first + count);
        self.touch_observation();
        count
    }

    // ========================================================================
    // Viewers (local to each replica, never logged)
    // ========================================================================

    /// Place or move a viewer of the given kind onto cell (x, y)
    ///
    /// Returns false when the cell is outside the grid.
    pub fn move_viewer(&mut self, id: ViewerId, kind: ViewerKind, x: i32, y: i32) -> bool {
        if !self.grid.in_bounds(x, y) {
            return false;
        }
        let (ux, uy) = (x as usize, y as usize);
        self.observation.upsert_viewer(id, kind, ux, uy);
        self.chunks
            .move_viewer(id, ux, uy, kind.chunk_radius(), &self.grid);
        self.refresh_observation();
        true
    }

    /// Remove a viewer from observation and chunk tracking
    pub fn remove_viewer(&mut self, id: ViewerId) -> bool {
        self.chunks.clear_viewer(id, &self.grid);
        self.observation.remove_viewer(id)
    }

    /// Refresh the composite map if dirty and not yet refreshed this tick
    pub fn refresh_observation(&mut self) -> bool {
        let occupied = self.civilians.occupied_cells(&self.grid);
        self.observation
            .refresh_if_dirty(&self.grid, &occupied, self.tick)
    }

    fn touch_observation(&mut self) {
        self.observation.mark_dirty();
        self.refresh_observation();
    }

    /// Take queued chunk load/unload/refresh events
    pub fn drain_chunk_events(&mut self) -> Vec<ChunkEvent> {
        self.chunks.drain_events()
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn grid(&self) -> &ResourceGrid {
        &self.grid
    }

    /// Ticks run so far
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Whether any cell is ignited or on-fire
    pub fn is_burning(&self) -> bool {
        self.still_burning
    }

    pub fn counters(&self) -> DestructionCounters {
        self.counters
    }

    /// Weighted damage of the episode so far
    pub fn damage_score(&self) -> u64 {
        self.counters.damage_score()
    }

    pub fn log(&self) -> &ActionLog {
        &self.log
    }

    pub fn observation(&self) -> &ObservationAggregator {
        &self.observation
    }

    pub fn chunks(&self) -> &ChunkVisibilityManager {
        &self.chunks
    }

    pub fn civilians(&self) -> &[Civilian] {
        self.civilians.civilians()
    }

    pub fn false_fires(&self) -> &[FalseFire] {
        &self.false_fires
    }

    /// Number of cells still wet
    pub fn wet_cell_count(&self) -> usize {
        self.wet_cells.len()
    }

    /// Hash of grid content, counters and tick for replica comparison
    pub fn fingerprint(&self) -> u64 {
        use std::hash::{Hash, Hasher};

        let mut hasher = rustc_hash::FxHasher::default();
        self.grid.fingerprint().hash(&mut hasher);
        self.counters.hash(&mut hasher);
        self.tick.hash(&mut hasher);
        for civilian in self.civilians.civilians() {
            (civilian.x, civilian.y, civilian.alive).hash(&mut hasher);
        }
        hasher.finish()
    }
}
