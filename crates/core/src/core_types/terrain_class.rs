//! Fixed terrain-class table.
//!
//! Maps the land-cover classes produced by the external terrain generator to
//! their starting tree count and flammability.

use crate::core_types::CombustionState;
use serde::{Deserialize, Serialize};

/// Land-cover class of a cell, fixed at grid creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainClass {
    DenseForest,
    LightForest,
    MediumForest,
    Rocks,
    Brush,
    Water,
}

impl TerrainClass {
    /// Every class in table order
    pub const ALL: [TerrainClass; 6] = [
        TerrainClass::DenseForest,
        TerrainClass::LightForest,
        TerrainClass::MediumForest,
        TerrainClass::Rocks,
        TerrainClass::Brush,
        TerrainClass::Water,
    ];

    /// Convert from table id (0-5)
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    /// Table id (0-5)
    pub fn id(self) -> u8 {
        match self {
            TerrainClass::DenseForest => 0,
            TerrainClass::LightForest => 1,
            TerrainClass::MediumForest => 2,
            TerrainClass::Rocks => 3,
            TerrainClass::Brush => 4,
            TerrainClass::Water => 5,
        }
    }

    /// Map a vegetation-density bucket (0 = bare, 4 = densest) to a class.
    ///
    /// Buckets above 4 clamp to dense forest.
    pub fn from_density_bucket(bucket: u8) -> Self {
        match bucket {
            0 => TerrainClass::Rocks,
            1 => TerrainClass::Brush,
            2 => TerrainClass::LightForest,
            3 => TerrainClass::MediumForest,
            _ => TerrainClass::DenseForest,
        }
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            TerrainClass::DenseForest => "dense forest",
            TerrainClass::LightForest => "light forest",
            TerrainClass::MediumForest => "medium forest",
            TerrainClass::Rocks => "rocks",
            TerrainClass::Brush => "brush",
            TerrainClass::Water => "water",
        }
    }

    /// Trees a cell of this class starts with (0-3)
    pub fn tree_count(self) -> u8 {
        match self {
            TerrainClass::DenseForest => 3,
            TerrainClass::MediumForest => 2,
            TerrainClass::LightForest => 1,
            TerrainClass::Rocks | TerrainClass::Brush | TerrainClass::Water => 0,
        }
    }

    /// Combustion state before building vulnerability is applied
    pub fn default_state(self) -> CombustionState {
        match self {
            TerrainClass::DenseForest | TerrainClass::LightForest | TerrainClass::MediumForest => {
                CombustionState::Burnable
            }
            TerrainClass::Rocks | TerrainClass::Brush | TerrainClass::Water => {
                CombustionState::NotBurnable
            }
        }
    }

    /// Whether the class can ever carry fire.
    ///
    /// Brush starts not-burnable but catches when it sits next to buildings.
    /// Rocks and water never burn on their own.
    pub fn is_flammable(self) -> bool {
        !matches!(self, TerrainClass::Rocks | TerrainClass::Water)
    }
}
