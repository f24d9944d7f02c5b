//! Wildfire Simulation Core Library
//!
//! A tick-driven, grid-based wildfire simulation for multi-agent training
//! scenarios. Fire ignites, spreads over a landscape of forests, brush and
//! buildings, and is fought by cutting fire breaks and spraying water.
//!
//! ## Components
//!
//! - [`grid`]: static-shape landscape grid built from external terrain maps
//! - [`spread`]: double-buffered probabilistic spread automaton
//! - [`suppression`]: tree cutting, water spraying and drying
//! - [`visibility`]: chunked load/unload of resources around viewers
//! - [`observation`]: accumulative partial-observation composite map
//! - [`simulation`]: the episode session, destruction counters, civilians
//!   and the action log that lets followers replay the authority exactly

// Core types and utilities
pub mod core_types;

pub mod grid;
pub mod observation;
pub mod simulation;
pub mod spread;
pub mod suppression;
pub mod visibility;

// Re-export core types
pub use core_types::{CombustionState, TerrainClass, Vec2, ViewerId};

pub use grid::{Cell, ResourceGrid, TerrainError, TerrainMaps};
pub use observation::{ObservationAggregator, ViewerKind};
pub use simulation::{
    ActionLog, ActionOpcode, ActionOutcome, ActionRecord, DestructionCounters, ReplayError, Role,
    SimulationConfig, TickReport, WildfireSimulation,
};
pub use spread::{FireSpreadEngine, SpreadConfig};
pub use suppression::{SprayOutcome, SprayPattern};
pub use visibility::{ChunkEvent, ChunkVisibilityManager, ResourceInstance};
