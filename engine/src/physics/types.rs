//! Physics type re-exports from glam
//!
//! This module provides the core mathematical types used throughout
//! the simulation, re-exported from the glam library.

pub use glam::{Mat4, Quat, Vec2, Vec3};

/// Horizontal (XZ-plane) projection of a world-space point.
#[inline]
pub fn ground_point(position: Vec3) -> Vec2 {
    Vec2::new(position.x, position.z)
}

/// Yaw (radians) that turns a +Z-facing model toward `direction`.
///
/// Returns `None` for a direction with no horizontal component.
pub fn facing_yaw(direction: Vec3) -> Option<f32> {
    let flat = Vec2::new(direction.x, direction.z);
    if flat.length_squared() < 1e-8 {
        None
    } else {
        Some(flat.x.atan2(flat.y))
    }
}
