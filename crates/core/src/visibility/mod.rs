//! Presentation-side visibility of destructible resources

pub mod chunks;

pub use chunks::{ChunkEvent, ChunkVisibilityManager, ResourceInstance, CHUNK_SLACK};
