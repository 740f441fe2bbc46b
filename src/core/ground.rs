//! Ground-plane helpers.
//!
//! The park is laid out on the XZ plane with Y up. All AI decisions work in
//! 2D ground coordinates, where `Vec2::x` maps to world X and `Vec2::y` maps
//! to world Z.

use bevy::prelude::*;

/// Project a world position onto the ground plane.
pub fn to_ground(position: Vec3) -> Vec2 {
    Vec2::new(position.x, position.z)
}

/// Lift a ground position back into the world at the given height.
pub fn from_ground(point: Vec2, height: f32) -> Vec3 {
    Vec3::new(point.x, height, point.y)
}
