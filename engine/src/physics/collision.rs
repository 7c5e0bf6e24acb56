//! Collision primitives
//!
//! Actor bounds are axis-aligned boxes. World geometry is either a box or
//! a triangle mesh. Box ray tests use the slab method: entry and exit
//! times are computed per axis and the ray hits when the latest entry
//! precedes the earliest exit. Triangles use the Möller–Trumbore test and
//! are struck on either face.
//!
//! # Example
//!
//! ```ignore
//! use bus_stop_engine::physics::collision::{Aabb, ray_aabb_intersect};
//! use glam::Vec3;
//!
//! let floor = Aabb::new(Vec3::new(-10.0, -1.0, -10.0), Vec3::new(10.0, 0.0, 10.0));
//! let t = ray_aabb_intersect(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y, floor.min, floor.max);
//! assert_eq!(t, Some(5.0));
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Box from two corners (reordered per axis so `min <= max`).
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Box from a center point and full size.
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Upright box standing on `base` (the bottom face is centered on it).
    ///
    /// Matches how mob bounds are authored: a footprint around the
    /// position with the height extending upward.
    pub fn standing_on(base: Vec3, width: f32, height: f32, depth: f32) -> Self {
        let half = Vec3::new(width * 0.5, 0.0, depth * 0.5);
        Self {
            min: base - half,
            max: base + half + Vec3::new(0.0, height, 0.0),
        }
    }

    /// Whether the point lies inside or on the box.
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Center of the box.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// Entry and exit distances of a ray through a box, `None` when the ray
/// misses it or the box lies entirely behind the origin.
///
/// The entry distance is negative when the origin is inside the box.
pub fn ray_aabb_span(
    ray_origin: Vec3,
    ray_dir: Vec3,
    aabb_min: Vec3,
    aabb_max: Vec3,
) -> Option<(f32, f32)> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;

    for axis in 0..3 {
        let origin = ray_origin[axis];
        let dir = ray_dir[axis];
        let (lo, hi) = (aabb_min[axis], aabb_max[axis]);

        if dir.abs() < 1e-10 {
            // Parallel to this slab: must already be between the planes
            if origin < lo || origin > hi {
                return None;
            }
            continue;
        }

        let inv = 1.0 / dir;
        let t1 = (lo - origin) * inv;
        let t2 = (hi - origin) * inv;
        t_enter = t_enter.max(t1.min(t2));
        t_exit = t_exit.min(t1.max(t2));
    }

    (t_exit >= t_enter && t_exit >= 0.0).then_some((t_enter, t_exit))
}

/// Performs ray-AABB intersection using the slab method.
///
/// # Arguments
///
/// * `ray_origin` - Starting point of the ray
/// * `ray_dir` - Direction of the ray (must be normalized)
/// * `aabb_min` - Minimum corner of the AABB
/// * `aabb_max` - Maximum corner of the AABB
///
/// # Returns
///
/// * `Some(t)` - Distance along the ray to the entry point (t >= 0)
/// * `None` - No intersection, the box is behind the origin, or the origin
///   is already inside the box
pub fn ray_aabb_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    aabb_min: Vec3,
    aabb_max: Vec3,
) -> Option<f32> {
    let (t_enter, _) = ray_aabb_span(ray_origin, ray_dir, aabb_min, aabb_max)?;
    (t_enter >= 0.0).then_some(t_enter)
}

/// Ray against the surface of a box, struck from outside or inside.
///
/// From outside this is the entry point; from inside it is the face the
/// ray leaves through.
pub fn ray_aabb_shell_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    aabb_min: Vec3,
    aabb_max: Vec3,
) -> Option<f32> {
    let (t_enter, t_exit) = ray_aabb_span(ray_origin, ray_dir, aabb_min, aabb_max)?;
    Some(if t_enter >= 0.0 { t_enter } else { t_exit })
}

/// Barycentric slack at triangle edges, so rays along a shared edge hit
/// one of its two triangles.
const EDGE_TOLERANCE: f32 = 1e-5;

/// Möller–Trumbore ray-triangle intersection, either face.
///
/// Returns the distance and the hit point. The point is rebuilt from the
/// barycentric coordinates so it lies exactly on axis-aligned triangles.
pub fn ray_triangle_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    max_t: f32,
    [v0, v1, v2]: [Vec3; 3],
) -> Option<(f32, Vec3)> {
    const EPSILON: f32 = 1e-6;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray_dir.cross(edge2);
    let a = edge1.dot(h);
    if a.abs() < EPSILON {
        return None; // Ray is parallel to triangle
    }

    let f = 1.0 / a;
    let s = ray_origin - v0;
    let u = f * s.dot(h);
    if !(-EDGE_TOLERANCE..=1.0 + EDGE_TOLERANCE).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray_dir.dot(q);
    if v < -EDGE_TOLERANCE || u + v > 1.0 + EDGE_TOLERANCE {
        return None;
    }

    let t = f * edge2.dot(q);
    (t > EPSILON && t <= max_t).then(|| (t, v0 + edge1 * u + edge2 * v))
}

/// Triangle soup in world space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    triangles: Vec<[Vec3; 3]>,
}

impl TriangleMesh {
    pub fn new(triangles: Vec<[Vec3; 3]>) -> Self {
        Self { triangles }
    }

    /// Build from a vertex list and index triples. Triples that point past
    /// the end of `vertices` are skipped.
    pub fn from_indexed(vertices: &[Vec3], indices: &[[u32; 3]]) -> Self {
        let triangles = indices
            .iter()
            .filter_map(|[a, b, c]| {
                Some([
                    *vertices.get(*a as usize)?,
                    *vertices.get(*b as usize)?,
                    *vertices.get(*c as usize)?,
                ])
            })
            .collect();
        Self { triangles }
    }

    pub fn triangles(&self) -> &[[Vec3; 3]] {
        &self.triangles
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Box around every vertex, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<Aabb> {
        let mut vertices = self.triangles.iter().flatten().copied();
        let first = vertices.next()?;
        let (min, max) = vertices.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Some(Aabb::new(min, max))
    }

    /// Nearest triangle hit within `max_t`.
    pub fn ray_intersect(&self, ray_origin: Vec3, ray_dir: Vec3, max_t: f32) -> Option<(f32, Vec3)> {
        self.triangles
            .iter()
            .filter_map(|tri| ray_triangle_intersect(ray_origin, ray_dir, max_t, *tri))
            .min_by(|a, b| a.0.total_cmp(&b.0))
    }
}
