//! Vector type alias for planar wind vectors and compass directions.

use nalgebra::Vector2;

/// 2D vector type for wind, spray aim, and neighbor directions.
///
/// This is a simple alias for `nalgebra::Vector2<f32>`. The grid is planar;
/// elevation is carried as a scalar on each cell.
pub type Vec2 = Vector2<f32>;
