//! FFI-exposed terrain and settings types.
//!
//! The host's terrain generator produces per-cell maps; `TerrainInput` points at
//! them and they are copied into Rust-owned memory when the instance is created.

use std::slice;

use wildfire_sim_core::{SimulationConfig, SpreadConfig, TerrainClass, TerrainMaps};

use crate::error::DefaultWildfireError;

/// Borrowed per-cell maps from the host, all `width * height` long in row-major order.
///
/// `elevation` and `vegetation` are required. `moisture`, `wind_x`, `wind_y` and
/// `buildings` may be null, meaning dry, calm and no buildings respectively.
#[repr(C)]
pub struct TerrainInput {
    /// Cells along x.
    pub width: usize,
    /// Cells along y.
    pub height: usize,
    /// Elevation in meters.
    pub elevation: *const f32,
    /// Moisture value per cell (0 = dry).
    pub moisture: *const f32,
    /// Terrain class ids: 0 dense forest, 1 light forest, 2 medium forest,
    /// 3 rocks, 4 brush, 5 water.
    pub vegetation: *const u8,
    /// Wind vector x component.
    pub wind_x: *const f32,
    /// Wind vector y component.
    pub wind_y: *const f32,
    /// Non-zero where a building stands.
    pub buildings: *const u8,
}

impl TerrainInput {
    /// Copy the host maps into owned `TerrainMaps`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTerrainParameters` for zero or overflowing dimensions and
    /// unknown terrain class ids, `NullPointer` for a missing required map.
    ///
    /// # Safety
    ///
    /// Every non-null pointer must be valid for `width * height` reads.
    pub(crate) unsafe fn to_maps(&self) -> Result<TerrainMaps, DefaultWildfireError> {
        let len = match self.width.checked_mul(self.height) {
            Some(len) if len > 0 => len,
            _ => {
                return Err(DefaultWildfireError::invalid_terrain_parameter_msg(
                    "width/height",
                    &format!("must be positive, got {}x{}", self.width, self.height),
                ))
            }
        };

        if self.elevation.is_null() {
            return Err(DefaultWildfireError::null_pointer("elevation"));
        }
        if self.vegetation.is_null() {
            return Err(DefaultWildfireError::null_pointer("vegetation"));
        }

        let vegetation = unsafe { slice::from_raw_parts(self.vegetation, len) }
            .iter()
            .enumerate()
            .map(|(i, &id)| {
                TerrainClass::from_id(id).ok_or_else(|| {
                    DefaultWildfireError::invalid_terrain_parameter_msg(
                        "vegetation",
                        &format!("unknown class id {id} at index {i}"),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let maps = TerrainMaps {
            width: self.width,
            height: self.height,
            elevation: unsafe { copy_or(self.elevation, len, 0.0) },
            moisture: unsafe { copy_or(self.moisture, len, 0.0) },
            vegetation,
            wind_x: unsafe { copy_or(self.wind_x, len, 0.0) },
            wind_y: unsafe { copy_or(self.wind_y, len, 0.0) },
            buildings: if self.buildings.is_null() {
                vec![false; len]
            } else {
                unsafe { slice::from_raw_parts(self.buildings, len) }
                    .iter()
                    .map(|&b| b != 0)
                    .collect()
            },
        };
        maps.validate()?;
        Ok(maps)
    }
}

/// Copy `len` values, or fill with `default` when the pointer is null.
unsafe fn copy_or(ptr: *const f32, len: usize, default: f32) -> Vec<f32> {
    if ptr.is_null() {
        vec![default; len]
    } else {
        unsafe { slice::from_raw_parts(ptr, len) }.to_vec()
    }
}

/// C-compatible flattening of `SimulationConfig`.
///
/// Obtain defaults from `wildfire_default_settings` and override fields.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationSettings {
    /// Base spread rate R0.
    pub base_rate: f32,
    /// Ratio above which a cell becomes ignited.
    pub ignition_threshold: f32,
    /// Ratio above which a cell goes straight to on-fire.
    pub flashover_threshold: f32,
    pub moisture_constant: f32,
    pub wet_moisture_bonus: f32,
    pub slope_scale: f32,
    pub slope_coefficient: f32,
    /// Ticks a cell spends extinguishing.
    pub extinguishing_ticks: u16,
    /// Ticks a sprayed cell stays wet.
    pub drying_ticks: u16,
    /// Lifetime of cosmetic fire markers.
    pub false_fire_ticks: u16,
    /// Chunk edge length in cells.
    pub chunk_size: usize,
    /// Dilation passes around buildings that make flammable cover burnable.
    pub building_vulnerability_range: usize,
    /// Civilians step every this many ticks (0 disables movement).
    pub civilian_move_interval: u64,
    /// Seed for the civilian random walk.
    pub seed: u64,
    /// Civilians the episode may spawn in total.
    pub max_civilians: u32,
}

impl From<&SimulationConfig> for SimulationSettings {
    fn from(config: &SimulationConfig) -> Self {
        let spread = &config.spread;
        Self {
            base_rate: spread.base_rate,
            ignition_threshold: spread.ignition_threshold,
            flashover_threshold: spread.flashover_threshold,
            moisture_constant: spread.moisture_constant,
            wet_moisture_bonus: spread.wet_moisture_bonus,
            slope_scale: spread.slope_scale,
            slope_coefficient: spread.slope_coefficient,
            extinguishing_ticks: spread.extinguishing_ticks,
            drying_ticks: config.drying_ticks,
            false_fire_ticks: config.false_fire_ticks,
            chunk_size: config.chunk_size,
            building_vulnerability_range: config.building_vulnerability_range,
            civilian_move_interval: config.civilian_move_interval,
            seed: config.seed,
            max_civilians: config.max_civilians,
        }
    }
}

impl SimulationSettings {
    /// Convert into a core config, rejecting values the engine cannot use.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for non-finite rates or a zero chunk size.
    pub(crate) fn to_config(&self) -> Result<SimulationConfig, DefaultWildfireError> {
        let floats = [
            ("base_rate", self.base_rate),
            ("ignition_threshold", self.ignition_threshold),
            ("flashover_threshold", self.flashover_threshold),
            ("moisture_constant", self.moisture_constant),
            ("wet_moisture_bonus", self.wet_moisture_bonus),
            ("slope_scale", self.slope_scale),
            ("slope_coefficient", self.slope_coefficient),
        ];
        if let Some((name, value)) = floats.iter().find(|(_, v)| !v.is_finite()) {
            return Err(DefaultWildfireError::invalid_parameter(format!(
                "Setting '{name}' must be finite, got {value}"
            )));
        }
        if self.chunk_size == 0 {
            return Err(DefaultWildfireError::invalid_parameter(
                "Setting 'chunk_size' must be positive".to_string(),
            ));
        }

        Ok(SimulationConfig {
            spread: SpreadConfig {
                base_rate: self.base_rate,
                ignition_threshold: self.ignition_threshold,
                flashover_threshold: self.flashover_threshold,
                moisture_constant: self.moisture_constant,
                wet_moisture_bonus: self.wet_moisture_bonus,
                slope_scale: self.slope_scale,
                slope_coefficient: self.slope_coefficient,
                extinguishing_ticks: self.extinguishing_ticks,
            },
            chunk_size: self.chunk_size,
            drying_ticks: self.drying_ticks,
            false_fire_ticks: self.false_fire_ticks,
            building_vulnerability_range: self.building_vulnerability_range,
            civilian_move_interval: self.civilian_move_interval,
            seed: self.seed,
            max_civilians: self.max_civilians,
        })
    }
}

/// Default settings matching `SimulationConfig::default()`.
#[no_mangle]
pub extern "C" fn wildfire_default_settings() -> SimulationSettings {
    SimulationSettings::from(&SimulationConfig::default())
}
