//! Probabilistic spread-ratio model
//!
//! `ratio = R0 * slope_factor * moisture_factor * (wind_alignment + 1) / 2`
//!
//! The ratio from an on-fire source to a burnable target is compared against
//! two thresholds: above the upper one the target flashes straight to on-fire,
//! above the lower one it becomes ignited.

use crate::core_types::Vec2;
use crate::grid::Cell;
use crate::spread::SpreadConfig;

/// Slope in degrees from `source` up to `target`.
///
/// Elevations are normalized, so `scale` converts the difference into the
/// rise-over-run of one cell step.
#[inline]
pub fn slope_degrees(source_elevation: f32, target_elevation: f32, scale: f32) -> f32 {
    ((target_elevation - source_elevation) * scale).atan().to_degrees()
}

/// Upslope spread grows exponentially, downslope spread decays toward 0.5.
#[inline]
pub fn slope_factor(slope: f32, coefficient: f32) -> f32 {
    if slope < 0.0 {
        let e = (-coefficient * slope).exp();
        e / (2.0 * e - 1.0)
    } else {
        (coefficient * slope).exp()
    }
}

/// Cosine between the source wind and the unit direction toward the target.
///
/// A calm source has no preferred direction and returns 0.
#[inline]
pub fn wind_alignment(wind: &Vec2, direction: &Vec2) -> f32 {
    let speed = wind.norm();
    if speed <= f32::EPSILON {
        return 0.0;
    }
    wind.dot(direction) / speed
}

/// Moisture penalty of the target; wet cells get an extra bonus.
#[inline]
pub fn moisture_factor(target: &Cell, config: &SpreadConfig) -> f32 {
    let bonus = if target.is_wet() {
        config.wet_moisture_bonus
    } else {
        0.0
    };
    1.0 - (target.moisture + bonus) / config.moisture_constant
}

/// Spread ratio from `source` to `target` along the unit `direction`
pub fn spread_ratio(source: &Cell, target: &Cell, direction: &Vec2, config: &SpreadConfig) -> f32 {
    let slope = slope_degrees(source.elevation, target.elevation, config.slope_scale);
    config.base_rate
        * slope_factor(slope, config.slope_coefficient)
        * moisture_factor(target, config)
        * (wind_alignment(&source.wind, direction) + 1.0)
        / 2.0
}
