//! Spatial query service
//!
//! Answers "what does this ray hit?" against an arbitrary target set.
//! Every simulation system (ground probes, wall probes, swept bullets)
//! goes through [`SpatialQuery`] so the backing implementation can be
//! swapped for a scene-graph raycaster without touching game logic.

use std::sync::Arc;

use glam::Vec3;

use super::collision::{
    Aabb, TriangleMesh, ray_aabb_intersect, ray_aabb_shell_intersect, ray_aabb_span,
};

/// Opaque reference to a collision shape.
///
/// World shapes are numbered at load time and never change. Dynamic
/// shapes belong to live actors; the actor registry keeps the mapping
/// from a dynamic handle to its owning actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeHandle {
    /// Static world geometry
    World(u32),
    /// Shape owned by a dynamic actor
    Dynamic(u32),
}

impl ShapeHandle {
    /// True for static world geometry.
    pub fn is_world(&self) -> bool {
        matches!(self, ShapeHandle::World(_))
    }
}

/// How a ray is resolved once it reaches a collider's bounds.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ColliderShape {
    /// Filled box. A ray starting inside reports nothing, so an actor
    /// never blocks its own shots.
    #[default]
    Solid,
    /// Box surface, struck from outside or from within.
    Shell,
    /// Triangles inside the bounds; the bounds are only the broad phase.
    Mesh(Arc<TriangleMesh>),
}

/// A queryable shape: bounds plus the handle reported on a hit.
#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    pub handle: ShapeHandle,
    pub bounds: Aabb,
    pub shape: ColliderShape,
}

impl Collider {
    /// Solid box collider.
    pub fn new(handle: ShapeHandle, bounds: Aabb) -> Self {
        Self::with_shape(handle, bounds, ColliderShape::Solid)
    }

    pub fn with_shape(handle: ShapeHandle, bounds: Aabb, shape: ColliderShape) -> Self {
        Self { handle, bounds, shape }
    }

    /// Distance and point of the nearest hit within `max_distance`.
    /// `dir` must be normalized.
    pub fn ray_cast(&self, origin: Vec3, dir: Vec3, max_distance: f32) -> Option<(f32, Vec3)> {
        let Aabb { min, max } = self.bounds;
        let t = match &self.shape {
            ColliderShape::Solid => ray_aabb_intersect(origin, dir, min, max)?,
            ColliderShape::Shell => ray_aabb_shell_intersect(origin, dir, min, max)?,
            ColliderShape::Mesh(mesh) => {
                let (t_enter, _) = ray_aabb_span(origin, dir, min, max)?;
                if t_enter > max_distance {
                    return None;
                }
                return mesh.ray_intersect(origin, dir, max_distance);
            }
        };
        (t <= max_distance).then(|| (t, origin + dir * t))
    }
}

/// One ray intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// World-space point where the ray struck
    pub point: Vec3,
    /// Distance from the ray origin to `point`
    pub distance: f32,
    /// Shape that was struck
    pub shape: ShapeHandle,
}

/// Ray intersection service.
pub trait SpatialQuery {
    /// Cast a ray and return every hit within `max_distance`, nearest first.
    ///
    /// `direction` need not be normalized; a zero direction yields no hits.
    fn intersect<'a, I>(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        targets: I,
    ) -> Vec<RayHit>
    where
        I: IntoIterator<Item = &'a Collider>;

    /// Nearest hit only.
    fn nearest<'a, I>(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        targets: I,
    ) -> Option<RayHit>
    where
        I: IntoIterator<Item = &'a Collider>,
    {
        self.intersect(origin, direction, max_distance, targets)
            .into_iter()
            .next()
    }
}

/// Brute-force raycaster: slab tests for boxes and mesh bounds, then
/// Möller–Trumbore for mesh triangles.
///
/// Every target is tested; fine for the handful of world objects and mobs
/// a level carries.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlabRaycaster;

impl SpatialQuery for SlabRaycaster {
    fn intersect<'a, I>(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        targets: I,
    ) -> Vec<RayHit>
    where
        I: IntoIterator<Item = &'a Collider>,
    {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO || max_distance <= 0.0 {
            return Vec::new();
        }

        let mut hits: Vec<RayHit> = targets
            .into_iter()
            .filter_map(|collider| {
                let (distance, point) = collider.ray_cast(origin, dir, max_distance)?;
                Some(RayHit {
                    point,
                    distance,
                    shape: collider.handle,
                })
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

/// Immutable set of static world colliders, built once at load time.
#[derive(Debug, Clone, Default)]
pub struct ColliderSet {
    colliders: Vec<Collider>,
}

impl ColliderSet {
    /// Box hulls numbered in order as `ShapeHandle::World(0..n)`.
    pub fn from_boxes(boxes: impl IntoIterator<Item = Aabb>) -> Self {
        Self::from_parts(boxes.into_iter().map(|b| (b, ColliderShape::Shell)))
    }

    /// Shapes numbered in order as `ShapeHandle::World(0..n)`.
    pub fn from_parts(parts: impl IntoIterator<Item = (Aabb, ColliderShape)>) -> Self {
        let colliders = parts
            .into_iter()
            .enumerate()
            .map(|(i, (bounds, shape))| {
                Collider::with_shape(ShapeHandle::World(i as u32), bounds, shape)
            })
            .collect();
        Self { colliders }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Collider> {
        self.colliders.iter()
    }

    pub fn as_slice(&self) -> &[Collider] {
        &self.colliders
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_walls() -> ColliderSet {
        ColliderSet::from_boxes([
            Aabb::new(Vec3::new(5.0, 0.0, -1.0), Vec3::new(6.0, 3.0, 1.0)),
            Aabb::new(Vec3::new(2.0, 0.0, -1.0), Vec3::new(3.0, 3.0, 1.0)),
        ])
    }

    #[test]
    fn test_hits_sorted_nearest_first() {
        let walls = two_walls();
        let hits = SlabRaycaster.intersect(Vec3::new(0.0, 1.0, 0.0), Vec3::X, 100.0, walls.iter());
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].shape, ShapeHandle::World(1));
        assert!((hits[0].distance - 2.0).abs() < 1e-5);
        assert!((hits[1].distance - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_max_distance_filters_far_hits() {
        let walls = two_walls();
        let hits = SlabRaycaster.intersect(Vec3::new(0.0, 1.0, 0.0), Vec3::X, 3.0, walls.iter());
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_unnormalized_direction_reports_true_distance() {
        let walls = two_walls();
        let hit = SlabRaycaster
            .nearest(Vec3::new(0.0, 1.0, 0.0), Vec3::X * 10.0, 100.0, walls.iter())
            .unwrap();
        assert!((hit.distance - 2.0).abs() < 1e-5);
        assert!((hit.point.x - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_zero_direction_yields_no_hits() {
        let walls = two_walls();
        assert!(
            SlabRaycaster
                .intersect(Vec3::ZERO, Vec3::ZERO, 100.0, walls.iter())
                .is_empty()
        );
    }

    #[test]
    fn test_world_handles_numbered_in_order() {
        let walls = two_walls();
        let handles: Vec<_> = walls.iter().map(|c| c.handle).collect();
        assert_eq!(handles, vec![ShapeHandle::World(0), ShapeHandle::World(1)]);
        assert!(handles[0].is_world());
    }

    fn bus_stop() -> ColliderSet {
        let floor = [
            Vec3::new(-20.0, 0.0, -20.0),
            Vec3::new(20.0, 0.0, -20.0),
            Vec3::new(20.0, 0.0, 20.0),
            Vec3::new(-20.0, 0.0, 20.0),
        ];
        let roof = floor.map(|v| Vec3::new(v.x * 0.15, 4.0, v.z * 0.15));
        let vertices: Vec<Vec3> = floor.into_iter().chain(roof).collect();
        let mesh = TriangleMesh::from_indexed(
            &vertices,
            &[[0, 1, 2], [0, 2, 3], [4, 5, 6], [4, 6, 7]],
        );
        let bounds = mesh.bounds().unwrap();
        ColliderSet::from_parts([(bounds, ColliderShape::Mesh(Arc::new(mesh)))])
    }

    #[test]
    fn test_mesh_floor_found_from_inside_its_bounds() {
        let stop = bus_stop();
        let hit = SlabRaycaster
            .nearest(Vec3::new(10.0, 1.6, 10.0), Vec3::NEG_Y, 10.0, stop.iter())
            .unwrap();
        assert_eq!(hit.point.y, 0.0);
        assert!((hit.distance - 1.6).abs() < 1e-5);
    }

    #[test]
    fn test_mesh_roof_blocks_from_below() {
        let stop = bus_stop();
        let hit = SlabRaycaster
            .nearest(Vec3::new(0.0, 1.6, 0.0), Vec3::Y, 10.0, stop.iter())
            .unwrap();
        assert_eq!(hit.point.y, 4.0);

        // Outside the roof footprint the ray escapes.
        assert!(
            SlabRaycaster
                .nearest(Vec3::new(10.0, 1.6, 10.0), Vec3::Y, 10.0, stop.iter())
                .is_none()
        );
    }

    #[test]
    fn test_hull_floor_found_from_inside() {
        let hull = ColliderSet::from_boxes([Aabb::new(
            Vec3::new(-20.0, 0.0, -20.0),
            Vec3::new(20.0, 4.0, 20.0),
        )]);
        let hit = SlabRaycaster
            .nearest(Vec3::new(10.0, 1.6, 10.0), Vec3::NEG_Y, 10.0, hull.iter())
            .unwrap();
        assert_eq!(hit.point.y, 0.0);
    }

    #[test]
    fn test_solid_box_ignores_ray_from_inside() {
        let body = Collider::new(
            ShapeHandle::Dynamic(0),
            Aabb::new(Vec3::new(-0.5, 0.0, -0.5), Vec3::new(0.5, 2.0, 0.5)),
        );
        let hits = SlabRaycaster.intersect(Vec3::new(0.0, 1.2, 0.0), Vec3::Z, 10.0, [&body]);
        assert!(hits.is_empty());
    }
}
