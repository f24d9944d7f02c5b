//! Chunked spatial level-of-detail for destructible resources
//!
//! The grid is split into square chunks. A chunk is loaded (its trees and
//! buildings materialized for presentation) exactly while at least one viewer
//! needs it. Simulation always runs grid-wide; only presentation is chunked.

use crate::core_types::ViewerId;
use crate::grid::ResourceGrid;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Chunks beyond a viewer's radius still visited so the viewer is dropped from them
pub const CHUNK_SLACK: i32 = 2;

/// Materialized resource on one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceInstance {
    pub x: usize,
    pub y: usize,
    pub trees: u8,
    pub building: bool,
}

/// Load state change for the presentation host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChunkEvent {
    Loaded { cx: usize, cy: usize },
    Unloaded { cx: usize, cy: usize },
    /// A loaded chunk's resources changed and were re-materialized
    Refreshed { cx: usize, cy: usize },
}

#[derive(Debug, Clone, Default)]
struct Chunk {
    viewers: FxHashSet<ViewerId>,
    loaded: bool,
    instances: Vec<ResourceInstance>,
}

/// Last chunk request of a viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ViewerAnchor {
    cx: i32,
    cy: i32,
    radius: u32,
}

/// Tracks which viewers need which chunks
#[derive(Debug, Clone)]
pub struct ChunkVisibilityManager {
    chunk_size: usize,
    chunks_x: usize,
    chunks_y: usize,
    chunks: Vec<Chunk>,
    anchors: FxHashMap<ViewerId, ViewerAnchor>,
    /// Loaded chunks whose resources changed since the last sync
    invalidated: FxHashSet<usize>,
    events: Vec<ChunkEvent>,
}

impl ChunkVisibilityManager {
    /// Partition a `width` x `height` grid into `chunk_size` squares.
    ///
    /// Partial chunks at the far edges are kept.
    pub fn new(width: usize, height: usize, chunk_size: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        let chunks_x = width.div_ceil(chunk_size);
        let chunks_y = height.div_ceil(chunk_size);
        ChunkVisibilityManager {
            chunk_size,
            chunks_x,
            chunks_y,
            chunks: vec![Chunk::default(); chunks_x * chunks_y],
            anchors: FxHashMap::default(),
            invalidated: FxHashSet::default(),
            events: Vec::new(),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Number of chunks along (x, y)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.chunks_x, self.chunks_y)
    }

    /// Chunk holding the cell at (x, y)
    pub fn chunk_of_cell(&self, x: usize, y: usize) -> (usize, usize) {
        (x / self.chunk_size, y / self.chunk_size)
    }

    fn chunk_index(&self, cx: usize, cy: usize) -> Option<usize> {
        (cx < self.chunks_x && cy < self.chunks_y).then_some(cy * self.chunks_x + cx)
    }

    pub fn is_loaded(&self, cx: usize, cy: usize) -> bool {
        self.chunk_index(cx, cy)
            .is_some_and(|i| self.chunks[i].loaded)
    }

    /// Number of distinct viewers needing the chunk
    pub fn viewer_count(&self, cx: usize, cy: usize) -> usize {
        self.chunk_index(cx, cy)
            .map_or(0, |i| self.chunks[i].viewers.len())
    }

    /// Materialized resources of a loaded chunk (empty when unloaded)
    pub fn instances(&self, cx: usize, cy: usize) -> &[ResourceInstance] {
        match self.chunk_index(cx, cy) {
            Some(i) => &self.chunks[i].instances,
            None => &[],
        }
    }

    pub fn loaded_count(&self) -> usize {
        self.chunks.iter().filter(|c| c.loaded).count()
    }

    /// Add `viewer` to every chunk within `radius` of `center` and drop it from
    /// chunks in the slack ring beyond.
    pub fn set_viewer_chunk_radius(
        &mut self,
        viewer: ViewerId,
        center: (i32, i32),
        radius: u32,
        grid: &ResourceGrid,
    ) {
        let reach = radius as i32 + CHUNK_SLACK;
        let (ccx, ccy) = center;

        for cy in ccy - reach..=ccy + reach {
            for cx in ccx - reach..=ccx + reach {
                if cx < 0 || cy < 0 {
                    continue;
                }
                let (ux, uy) = (cx as usize, cy as usize);
                let Some(idx) = self.chunk_index(ux, uy) else {
                    continue;
                };

                let dx = (cx - ccx) as f32;
                let dy = (cy - ccy) as f32;
                if (dx * dx + dy * dy).sqrt() <= radius as f32 {
                    self.chunks[idx].viewers.insert(viewer);
                } else {
                    self.chunks[idx].viewers.remove(&viewer);
                }
                self.refresh_chunk(ux, uy, grid);
            }
        }

        self.anchors.insert(
            viewer,
            ViewerAnchor {
                cx: ccx,
                cy: ccy,
                radius,
            },
        );
    }

    /// Re-anchor a viewer on the chunk holding cell (x, y).
    ///
    /// Does nothing while the viewer stays inside the same chunk. A jump larger
    /// than the slack ring clears the old neighborhood first.
    pub fn move_viewer(
        &mut self,
        viewer: ViewerId,
        x: usize,
        y: usize,
        radius: u32,
        grid: &ResourceGrid,
    ) {
        let (cx, cy) = self.chunk_of_cell(x, y);
        let center = (cx as i32, cy as i32);

        if let Some(anchor) = self.anchors.get(&viewer).copied() {
            if (anchor.cx, anchor.cy) == center && anchor.radius == radius {
                return;
            }
            let jump = (anchor.cx - center.0).abs().max((anchor.cy - center.1).abs());
            if jump > CHUNK_SLACK || anchor.radius > radius {
                self.clear_viewer(viewer, grid);
            }
        }

        self.set_viewer_chunk_radius(viewer, center, radius, grid);
    }

    /// Remove a viewer from every chunk
    pub fn clear_viewer(&mut self, viewer: ViewerId, grid: &ResourceGrid) {
        self.anchors.remove(&viewer);
        for idx in 0..self.chunks.len() {
            if self.chunks[idx].viewers.remove(&viewer) {
                self.refresh_chunk(idx % self.chunks_x, idx / self.chunks_x, grid);
            }
        }
    }

    /// Load or unload a chunk so that loaded matches having viewers
    pub fn refresh_chunk(&mut self, cx: usize, cy: usize, grid: &ResourceGrid) {
        let Some(idx) = self.chunk_index(cx, cy) else {
            return;
        };

        let wanted = !self.chunks[idx].viewers.is_empty();
        if wanted && !self.chunks[idx].loaded {
            self.chunks[idx].instances = self.materialize(cx, cy, grid);
            self.chunks[idx].loaded = true;
            self.events.push(ChunkEvent::Loaded { cx, cy });
            debug!("Chunk ({}, {}) loaded with {} resources", cx, cy, self.chunks[idx].instances.len());
        } else if !wanted && self.chunks[idx].loaded {
            self.chunks[idx].instances.clear();
            self.chunks[idx].loaded = false;
            self.invalidated.remove(&idx);
            self.events.push(ChunkEvent::Unloaded { cx, cy });
            debug!("Chunk ({}, {}) unloaded", cx, cy);
        }
    }

    /// Note that the resources on cell (x, y) changed
    pub fn invalidate_cell(&mut self, x: usize, y: usize) {
        let (cx, cy) = self.chunk_of_cell(x, y);
        if let Some(idx) = self.chunk_index(cx, cy) {
            if self.chunks[idx].loaded {
                self.invalidated.insert(idx);
            }
        }
    }

    /// Re-materialize every invalidated loaded chunk
    pub fn sync_invalidated(&mut self, grid: &ResourceGrid) {
        let mut pending: Vec<usize> = self.invalidated.drain().collect();
        pending.sort_unstable();

        for idx in pending {
            let (cx, cy) = (idx % self.chunks_x, idx / self.chunks_x);
            if !self.chunks[idx].loaded {
                continue;
            }
            self.chunks[idx].instances = self.materialize(cx, cy, grid);
            self.events.push(ChunkEvent::Refreshed { cx, cy });
        }
    }

    /// Take queued events in emission order
    pub fn drain_events(&mut self) -> Vec<ChunkEvent> {
        std::mem::take(&mut self.events)
    }

    fn materialize(&self, cx: usize, cy: usize, grid: &ResourceGrid) -> Vec<ResourceInstance> {
        let x0 = cx * self.chunk_size;
        let y0 = cy * self.chunk_size;
        let x1 = (x0 + self.chunk_size).min(grid.width());
        let y1 = (y0 + self.chunk_size).min(grid.height());

        let mut instances = Vec::new();
        for y in y0..y1 {
            for x in x0..x1 {
                let cell = &grid.cells()[grid.index(x, y)];
                if cell.trees() > 0 || cell.has_building() {
                    instances.push(ResourceInstance {
                        x,
                        y,
                        trees: cell.trees(),
                        building: cell.has_building(),
                    });
                }
            }
        }
        instances
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::TerrainClass;
    use crate::grid::TerrainMaps;

    fn grid(size: usize) -> ResourceGrid {
        ResourceGrid::from_terrain(&TerrainMaps::uniform(size, size, TerrainClass::DenseForest), 2)
            .unwrap()
    }

    #[test]
    fn test_partition_keeps_partial_chunks() {
        let manager = ChunkVisibilityManager::new(25, 30, 10);
        assert_eq!(manager.dimensions(), (3, 3));
        assert_eq!(manager.chunk_of_cell(24, 29), (2, 2));
    }

    #[test]
    fn test_loaded_iff_viewers() {
        let grid = grid(100);
        let mut manager = ChunkVisibilityManager::new(100, 100, 10);

        manager.set_viewer_chunk_radius(1, (5, 5), 1, &grid);
        assert!(manager.is_loaded(5, 5));
        assert!(manager.is_loaded(5, 6));
        assert!(!manager.is_loaded(6, 6));
        assert_eq!(manager.loaded_count(), 5);
        assert_eq!(manager.instances(5, 5).len(), 100);

        manager.set_viewer_chunk_radius(2, (5, 5), 0, &grid);
        assert_eq!(manager.viewer_count(5, 5), 2);

        manager.clear_viewer(1, &grid);
        assert!(manager.is_loaded(5, 5));
        assert!(!manager.is_loaded(5, 6));
        manager.clear_viewer(2, &grid);
        assert_eq!(manager.loaded_count(), 0);
        assert!(manager.instances(5, 5).is_empty());
    }

    #[test]
    fn test_events_follow_transitions() {
        let grid = grid(30);
        let mut manager = ChunkVisibilityManager::new(30, 30, 10);
        manager.set_viewer_chunk_radius(7, (0, 0), 0, &grid);
        manager.set_viewer_chunk_radius(7, (0, 0), 0, &grid);
        assert_eq!(manager.drain_events(), vec![ChunkEvent::Loaded { cx: 0, cy: 0 }]);

        manager.set_viewer_chunk_radius(7, (1, 0), 0, &grid);
        let events = manager.drain_events();
        assert!(events.contains(&ChunkEvent::Unloaded { cx: 0, cy: 0 }));
        assert!(events.contains(&ChunkEvent::Loaded { cx: 1, cy: 0 }));
        assert!(manager.drain_events().is_empty());
    }

    #[test]
    fn test_invalidation_refreshes_loaded_chunks_only() {
        let mut grid = grid(20);
        let mut manager = ChunkVisibilityManager::new(20, 20, 10);
        manager.set_viewer_chunk_radius(1, (0, 0), 0, &grid);
        manager.drain_events();

        grid.cell_mut(3, 3).unwrap().remove_trees(3);
        manager.invalidate_cell(3, 3);
        manager.invalidate_cell(15, 15);
        manager.sync_invalidated(&grid);

        assert_eq!(manager.drain_events(), vec![ChunkEvent::Refreshed { cx: 0, cy: 0 }]);
        assert_eq!(manager.instances(0, 0).len(), 99);
    }

    #[test]
    fn test_move_viewer_far_jump_clears_old_area() {
        let grid = grid(200);
        let mut manager = ChunkVisibilityManager::new(200, 200, 10);
        manager.move_viewer(3, 15, 15, 1, &grid);
        assert!(manager.is_loaded(1, 1));

        manager.move_viewer(3, 16, 18, 1, &grid);
        assert!(manager.is_loaded(1, 1));

        manager.move_viewer(3, 150, 150, 1, &grid);
        assert!(!manager.is_loaded(1, 1));
        assert!(manager.is_loaded(15, 15));
        assert_eq!(manager.loaded_count(), 5);
    }
}
