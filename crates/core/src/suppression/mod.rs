//! Fire suppression actions
//!
//! - Cutting trees to build fire breaks
//! - Spraying water to put out burning cells and soak the rest
//! - Drying soaked cells back to their baseline

pub mod cutting;
pub mod water;

pub use cutting::cut_trees;
pub use water::{dry_cells, extinguish_region, signed_angle, spray_cells, SprayOutcome, SprayPattern};
