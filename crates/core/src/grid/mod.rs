//! Grid-based landscape data

pub mod cell;
pub mod resource_grid;
pub mod terrain_maps;

// Re-export main types
pub use cell::{Cell, Destruction, MAX_TREES};
pub use resource_grid::{ResourceGrid, NEIGHBOR_OFFSETS};
pub use terrain_maps::{TerrainError, TerrainMaps};
