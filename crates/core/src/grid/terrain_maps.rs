//! Static terrain maps consumed from the external terrain generator
//!
//! The core never generates terrain. Hosts hand over per-cell elevation,
//! moisture, land-cover class, wind and building occupancy as flat row-major
//! arrays (`[y * width + x]`), and the grid is built from them once per episode.

use crate::core_types::{TerrainClass, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error produced when terrain maps cannot form a grid
#[derive(Debug, Clone, PartialEq)]
pub enum TerrainError {
    /// Width or height is zero
    EmptyDimensions { width: usize, height: usize },
    /// A map's length does not match `width * height`
    LengthMismatch {
        map: &'static str,
        expected: usize,
        actual: usize,
    },
    /// A map contains NaN or infinity
    NonFiniteValue { map: &'static str, index: usize },
}

impl fmt::Display for TerrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerrainError::EmptyDimensions { width, height } => {
                write!(f, "terrain dimensions must be positive, got {width}x{height}")
            }
            TerrainError::LengthMismatch {
                map,
                expected,
                actual,
            } => write!(
                f,
                "{map} map has {actual} values, expected {expected}"
            ),
            TerrainError::NonFiniteValue { map, index } => {
                write!(f, "{map} map has a non-finite value at index {index}")
            }
        }
    }
}

impl std::error::Error for TerrainError {}

/// Per-cell input maps of matching dimensions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainMaps {
    pub width: usize,
    pub height: usize,
    /// Normalized elevation (the generator emits 0-1)
    pub elevation: Vec<f32>,
    /// Static fuel moisture (the generator emits 0.4-0.8)
    pub moisture: Vec<f32>,
    /// Land-cover class per cell
    pub vegetation: Vec<TerrainClass>,
    /// Wind X component
    pub wind_x: Vec<f32>,
    /// Wind Y component
    pub wind_y: Vec<f32>,
    /// Building occupancy
    pub buildings: Vec<bool>,
}

impl TerrainMaps {
    /// Flat, calm, bone-dry terrain of a single class
    pub fn uniform(width: usize, height: usize, class: TerrainClass) -> Self {
        let len = width * height;
        TerrainMaps {
            width,
            height,
            elevation: vec![0.0; len],
            moisture: vec![0.0; len],
            vegetation: vec![class; len],
            wind_x: vec![0.0; len],
            wind_y: vec![0.0; len],
            buildings: vec![false; len],
        }
    }

    /// Uniform terrain with a Gaussian hill in the middle
    pub fn single_hill(
        width: usize,
        height: usize,
        class: TerrainClass,
        hill_height: f32,
        hill_radius: f32,
    ) -> Self {
        let mut maps = Self::uniform(width, height, class);
        let center_x = width as f32 / 2.0;
        let center_y = height as f32 / 2.0;

        for y in 0..height {
            for x in 0..width {
                let dx = x as f32 - center_x;
                let dy = y as f32 - center_y;
                let dist_sq = dx * dx + dy * dy;
                maps.elevation[y * width + x] =
                    hill_height * (-dist_sq / (hill_radius * hill_radius)).exp();
            }
        }

        maps
    }

    /// Set the same wind vector on every cell
    pub fn with_uniform_wind(mut self, wind: Vec2) -> Self {
        self.wind_x.fill(wind.x);
        self.wind_y.fill(wind.y);
        self
    }

    /// Set the same moisture on every cell
    pub fn with_uniform_moisture(mut self, moisture: f32) -> Self {
        self.moisture.fill(moisture);
        self
    }

    /// Override the class of one cell (no-op out of bounds)
    pub fn set_class(&mut self, x: usize, y: usize, class: TerrainClass) {
        if x < self.width && y < self.height {
            self.vegetation[y * self.width + x] = class;
        }
    }

    /// Place a building on one cell (no-op out of bounds)
    pub fn place_building(&mut self, x: usize, y: usize) {
        if x < self.width && y < self.height {
            self.buildings[y * self.width + x] = true;
        }
    }

    /// Check dimensions, lengths and finiteness of every map
    ///
    /// # Errors
    ///
    /// Returns the first [`TerrainError`] found.
    pub fn validate(&self) -> Result<(), TerrainError> {
        if self.width == 0 || self.height == 0 {
            return Err(TerrainError::EmptyDimensions {
                width: self.width,
                height: self.height,
            });
        }

        let expected = self.width * self.height;
        let lengths = [
            ("elevation", self.elevation.len()),
            ("moisture", self.moisture.len()),
            ("vegetation", self.vegetation.len()),
            ("wind_x", self.wind_x.len()),
            ("wind_y", self.wind_y.len()),
            ("buildings", self.buildings.len()),
        ];
        for (map, actual) in lengths {
            if actual != expected {
                return Err(TerrainError::LengthMismatch {
                    map,
                    expected,
                    actual,
                });
            }
        }

        let real_maps = [
            ("elevation", &self.elevation),
            ("moisture", &self.moisture),
            ("wind_x", &self.wind_x),
            ("wind_y", &self.wind_y),
        ];
        for (map, values) in real_maps {
            if let Some(index) = values.iter().position(|v| !v.is_finite()) {
                return Err(TerrainError::NonFiniteValue { map, index });
            }
        }

        Ok(())
    }

    /// Dilate building occupancy over the 8-neighborhood `iterations` times.
    ///
    /// Only interior cells seed the dilation so it never reads past the edge.
    pub fn vulnerability_mask(&self, iterations: usize) -> Vec<bool> {
        let (w, h) = (self.width, self.height);
        let mut mask = self.buildings.clone();

        for _ in 0..iterations {
            let mut expanded = mask.clone();
            for y in 1..h.saturating_sub(1) {
                for x in 1..w.saturating_sub(1) {
                    if !mask[y * w + x] {
                        continue;
                    }
                    for ny in y - 1..=y + 1 {
                        for nx in x - 1..=x + 1 {
                            expanded[ny * w + nx] = true;
                        }
                    }
                }
            }
            mask = expanded;
        }

        mask
    }
}
