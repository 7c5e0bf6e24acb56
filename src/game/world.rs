//! World Data
//!
//! Static level geometry as the asset collaborator hands it over: named
//! objects made of vertices, optional triangle indices and a
//! local-to-world transform. A one-time build step splits them into
//! colliders and route paths; neither changes during play.

use std::path::Path;
use std::sync::Arc;

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::game::error::{LoadError, read_file};
use crate::physics::{Aabb, ColliderSet, ColliderShape, TriangleMesh};

/// Half-size of the stand-in floor used when no world loaded.
const FALLBACK_FLOOR_HALF_EXTENT: f32 = 300.0;

/// One named piece of world geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldObject {
    pub name: String,
    /// Local-space vertices
    #[serde(default)]
    pub vertices: Vec<Vec3>,
    /// Triangles as index triples into `vertices`; empty for box hulls
    /// and paths
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indices: Vec<[u32; 3]>,
    /// Local-to-world transform (column-major)
    #[serde(default = "identity")]
    pub transform: Mat4,
}

fn identity() -> Mat4 {
    Mat4::IDENTITY
}

fn unit_scale() -> f32 {
    1.0
}

impl WorldObject {
    /// Object whose vertices are the eight corners of `bounds`.
    pub fn solid_box(name: impl Into<String>, bounds: Aabb) -> Self {
        let (lo, hi) = (bounds.min, bounds.max);
        let vertices = (0..8)
            .map(|i| {
                Vec3::new(
                    if i & 1 == 0 { lo.x } else { hi.x },
                    if i & 2 == 0 { lo.y } else { hi.y },
                    if i & 4 == 0 { lo.z } else { hi.z },
                )
            })
            .collect();
        Self {
            name: name.into(),
            vertices,
            indices: Vec::new(),
            transform: Mat4::IDENTITY,
        }
    }

    /// Triangle mesh object.
    pub fn mesh(name: impl Into<String>, vertices: Vec<Vec3>, indices: Vec<[u32; 3]>) -> Self {
        Self {
            name: name.into(),
            vertices,
            indices,
            transform: Mat4::IDENTITY,
        }
    }

    /// Path-style object: a polyline of points.
    pub fn path(name: impl Into<String>, points: impl IntoIterator<Item = Vec3>) -> Self {
        Self {
            name: name.into(),
            vertices: points.into_iter().collect(),
            indices: Vec::new(),
            transform: Mat4::IDENTITY,
        }
    }

    /// Vertices in world space, in authoring order.
    pub fn world_vertices(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertices
            .iter()
            .map(|v| self.transform.transform_point3(*v))
    }

    /// World-space bounding box, `None` for an object with no vertices.
    pub fn world_bounds(&self) -> Option<Aabb> {
        let mut vertices = self.world_vertices();
        let first = vertices.next()?;
        let (min, max) = vertices.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Some(Aabb::new(min, max))
    }

    /// Collision shape and its bounds. Indexed objects collide as their
    /// triangles, the rest as the hull of their vertices.
    pub fn collider_part(&self) -> Option<(Aabb, ColliderShape)> {
        if !self.indices.is_empty() {
            let vertices: Vec<Vec3> = self.world_vertices().collect();
            let mesh = TriangleMesh::from_indexed(&vertices, &self.indices);
            if let Some(bounds) = mesh.bounds() {
                return Some((bounds, ColliderShape::Mesh(Arc::new(mesh))));
            }
            warn!(name = %self.name, "no valid triangles, colliding as a box");
        }
        Some((self.world_bounds()?, ColliderShape::Shell))
    }
}

/// Level geometry file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldData {
    #[serde(default = "unit_scale")]
    pub scale: f32,
    #[serde(default)]
    pub objects: Vec<WorldObject>,
}

impl WorldData {
    pub fn new(objects: Vec<WorldObject>) -> Self {
        Self {
            scale: 1.0,
            objects,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, LoadError> {
        Self::from_json_str(&read_file(path)?)
    }
}

/// Geometry split into its two runtime roles.
#[derive(Debug, Clone, Default)]
pub struct StaticWorld {
    /// Floor, wall and bullet targets
    pub colliders: ColliderSet,
    /// Route-defining objects, world scale applied, never collidable
    pub paths: Vec<WorldObject>,
}

impl StaticWorld {
    /// Split `data` by name: objects named with `route_prefix` become
    /// paths, everything else with geometry becomes a collider. Without
    /// world data a large floor slab at y = 0 stands in.
    pub fn build(data: Option<&WorldData>, route_prefix: &str) -> Self {
        let Some(data) = data else {
            info!("no world geometry loaded, using fallback floor");
            return Self::fallback_floor();
        };

        let world_scale = Mat4::from_scale(Vec3::splat(data.scale));
        let mut parts = Vec::new();
        let mut paths = Vec::new();

        for object in &data.objects {
            let mut placed = object.clone();
            placed.transform = world_scale * object.transform;

            if object.name.starts_with(route_prefix) {
                paths.push(placed);
            } else if let Some(part) = placed.collider_part() {
                parts.push(part);
            } else {
                debug!(name = %object.name, "world object has no geometry, skipped");
            }
        }

        info!(colliders = parts.len(), paths = paths.len(), "world geometry built");
        Self {
            colliders: ColliderSet::from_parts(parts),
            paths,
        }
    }

    fn fallback_floor() -> Self {
        let h = FALLBACK_FLOOR_HALF_EXTENT;
        Self {
            colliders: ColliderSet::from_boxes([Aabb::new(
                Vec3::new(-h, -1.0, -h),
                Vec3::new(h, 0.0, h),
            )]),
            paths: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_floor_without_world() {
        let world = StaticWorld::build(None, "Route_");
        assert_eq!(world.colliders.len(), 1);
        let floor = world.colliders.as_slice()[0].bounds;
        assert_eq!(floor.max.y, 0.0);
        assert!(world.paths.is_empty());
    }

    #[test]
    fn test_routes_are_not_colliders() {
        let data = WorldData::new(vec![
            WorldObject::solid_box("Ground", Aabb::new(Vec3::new(-5.0, -1.0, -5.0), Vec3::new(5.0, 0.0, 5.0))),
            WorldObject::path("Route_Enemy1", [Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)]),
        ]);
        let world = StaticWorld::build(Some(&data), "Route_");
        assert_eq!(world.colliders.len(), 1);
        assert_eq!(world.paths.len(), 1);
        assert_eq!(world.paths[0].name, "Route_Enemy1");
    }

    #[test]
    fn test_world_scale_applies_to_colliders_and_paths() {
        let mut data = WorldData::new(vec![
            WorldObject::solid_box("Crate", Aabb::new(Vec3::ZERO, Vec3::ONE)),
            WorldObject::path("Route_NPC1", [Vec3::new(1.0, 0.0, 1.0)]),
        ]);
        data.scale = 2.0;
        let world = StaticWorld::build(Some(&data), "Route_");
        assert_eq!(world.colliders.as_slice()[0].bounds.max, Vec3::splat(2.0));
        let point = world.paths[0].world_vertices().next().unwrap();
        assert_eq!(point, Vec3::new(2.0, 0.0, 2.0));
    }

    #[test]
    fn test_world_bounds_use_transform() {
        let mut object = WorldObject::solid_box("Crate", Aabb::new(Vec3::ZERO, Vec3::ONE));
        object.transform = Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0));
        let bounds = object.world_bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(11.0, 1.0, 1.0));
    }

    #[test]
    fn test_world_json_round_trip_of_transform() {
        let json = r#"{
            "objects": [
                { "name": "Route_Enemy2", "vertices": [[0,0,0],[4,0,0]] }
            ]
        }"#;
        let data = WorldData::from_json_str(json).unwrap();
        assert_eq!(data.scale, 1.0);
        assert_eq!(data.objects[0].transform, Mat4::IDENTITY);
        assert_eq!(data.objects[0].vertices.len(), 2);
    }

    #[test]
    fn test_indexed_object_collides_as_triangles() {
        let vertices = vec![
            Vec3::new(-20.0, 0.0, -20.0),
            Vec3::new(20.0, 0.0, -20.0),
            Vec3::new(20.0, 0.0, 20.0),
            Vec3::new(-20.0, 0.0, 20.0),
            Vec3::new(-3.0, 4.0, -3.0),
            Vec3::new(3.0, 4.0, -3.0),
            Vec3::new(3.0, 4.0, 3.0),
            Vec3::new(-3.0, 4.0, 3.0),
        ];
        let indices = vec![[0, 1, 2], [0, 2, 3], [4, 5, 6], [4, 6, 7]];
        let data = WorldData::new(vec![WorldObject::mesh("BusStop", vertices, indices)]);
        let world = StaticWorld::build(Some(&data), "Route_");

        let collider = &world.colliders.as_slice()[0];
        let ColliderShape::Mesh(mesh) = &collider.shape else {
            panic!("expected a mesh collider, got {:?}", collider.shape);
        };
        assert_eq!(mesh.len(), 4);
        assert_eq!(collider.bounds.max, Vec3::new(20.0, 4.0, 20.0));
    }

    #[test]
    fn test_indices_out_of_range_fall_back_to_hull() {
        let object = WorldObject::mesh("Broken", vec![Vec3::ZERO, Vec3::ONE], vec![[0, 1, 5]]);
        let (bounds, shape) = object.collider_part().unwrap();
        assert_eq!(shape, ColliderShape::Shell);
        assert_eq!(bounds.max, Vec3::ONE);
    }

    #[test]
    fn test_indices_parse_from_json() {
        let json = r#"{
            "objects": [
                { "name": "Shelter", "vertices": [[0,0,0],[1,0,0],[0,0,1]], "indices": [[0,1,2]] }
            ]
        }"#;
        let data = WorldData::from_json_str(json).unwrap();
        assert_eq!(data.objects[0].indices, vec![[0, 1, 2]]);
    }
}
