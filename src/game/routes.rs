//! Route Table
//!
//! Patrol routes extracted once from named path objects. Each route is an
//! ordered, looped list of ground points (x, z) in world space. Mobs hold
//! an `Arc<Route>` so the table stays the single owner of the point data.
//!
//! Route names encode who walks them: `"<prefix>Enemy<N>"` and
//! `"<prefix>NPC<N>"`, with N counting from 1.

use std::collections::HashMap;
use std::sync::Arc;

use glam::{Vec2, Vec3};
use tracing::{debug, info};

use crate::game::actors::MobKind;
use crate::game::world::WorldObject;
use crate::physics::ground_point;

/// Height at which route overlays are drawn.
pub const DEBUG_LINE_HEIGHT: f32 = 5.0;

/// Overlay color of enemy routes.
pub const ENEMY_ROUTE_COLOR: u32 = 0xff0000;

/// Overlay color of every other route.
pub const NPC_ROUTE_COLOR: u32 = 0x00ff00;

/// A looped sequence of ground waypoints. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    points: Vec<Vec2>,
}

impl Route {
    /// `None` when there are no points.
    pub fn new(points: Vec<Vec2>) -> Option<Self> {
        (!points.is_empty()).then_some(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for the `len` convention.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Waypoint at `index`, wrapping around the loop.
    pub fn point(&self, index: usize) -> Vec2 {
        self.points[index % self.points.len()]
    }

    /// Index that follows `index` on the loop.
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.points.len()
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }
}

/// Polyline for the route debug overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLine {
    pub name: String,
    pub points: Vec<Vec3>,
    pub color: u32,
}

/// Name of the route assigned to the `index`-th (0-based) mob of `kind`.
pub fn route_name(prefix: &str, kind: MobKind, index: usize) -> String {
    format!("{prefix}{}{}", kind.route_label(), index + 1)
}

/// Immutable name → route mapping.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: HashMap<String, Arc<Route>>,
}

impl RouteTable {
    /// Build from path objects (already filtered to route objects).
    ///
    /// Vertices are taken in authoring order and projected to the ground
    /// plane. Paths without vertices are dropped. A later path with the
    /// same name replaces an earlier one.
    pub fn from_paths<'a>(paths: impl IntoIterator<Item = &'a WorldObject>) -> Self {
        let mut routes = HashMap::new();
        for path in paths {
            let points: Vec<Vec2> = path.world_vertices().map(ground_point).collect();
            match Route::new(points) {
                Some(route) => {
                    debug!(name = %path.name, points = route.len(), "route loaded");
                    routes.insert(path.name.clone(), Arc::new(route));
                }
                None => debug!(name = %path.name, "empty route dropped"),
            }
        }
        info!(routes = routes.len(), "route table built");
        Self { routes }
    }

    pub fn get(&self, name: &str) -> Option<Arc<Route>> {
        self.routes.get(name).cloned()
    }

    /// Route for the `index`-th (0-based) mob of `kind`, if one exists.
    pub fn for_mob(&self, prefix: &str, kind: MobKind, index: usize) -> Option<Arc<Route>> {
        self.get(&route_name(prefix, kind, index))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Overlay polylines, one per route, sorted by name.
    ///
    /// Names containing "enemy" in any case are drawn red, the rest green.
    pub fn debug_lines(&self) -> Vec<RouteLine> {
        let mut lines: Vec<RouteLine> = self
            .routes
            .iter()
            .map(|(name, route)| RouteLine {
                name: name.clone(),
                points: route
                    .points()
                    .iter()
                    .map(|p| Vec3::new(p.x, DEBUG_LINE_HEIGHT, p.y))
                    .collect(),
                color: if name.to_lowercase().contains("enemy") {
                    ENEMY_ROUTE_COLOR
                } else {
                    NPC_ROUTE_COLOR
                },
            })
            .collect();
        lines.sort_by(|a, b| a.name.cmp(&b.name));
        lines
    }
}
