//! Physics module
//!
//! Collision geometry and the ray query service the simulation is built on.
//! No external physics library: actors are resolved with rays against
//! axis-aligned boxes, world geometry against boxes or triangle meshes.
//!
//! # Unit System
//!
//! **1 unit = 1 meter**, velocities in m/s, accelerations in m/s².
//!
//! # Submodules
//!
//! - [`types`] - Core mathematical types re-exported from glam
//! - [`collision`] - Boxes, triangle meshes and their ray tests
//! - [`query`] - The [`SpatialQuery`] service, shape handles and the static collider set

pub mod collision;
pub mod query;
pub mod types;

pub use collision::{Aabb, TriangleMesh, ray_aabb_intersect};
pub use query::{
    Collider, ColliderSet, ColliderShape, RayHit, ShapeHandle, SlabRaycaster, SpatialQuery,
};
pub use types::{Mat4, Quat, Vec2, Vec3, facing_yaw, ground_point};
