//! Core types and utilities

pub mod combustion;
pub mod terrain_class;
pub mod vec2;

pub use combustion::CombustionState;
pub use terrain_class::TerrainClass;
pub use vec2::Vec2;

/// Identifier of an external viewer (agent, camera, player).
pub type ViewerId = u32;
