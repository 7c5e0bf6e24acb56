//! Level population
//!
//! Places the level's enemies and NPCs. The N-th mob of a kind walks the
//! route named for it and starts on that route's first point; mobs
//! without a route are dropped at a random spot that has floor under it.

use glam::{Vec2, Vec3};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::game::actors::{ActorRegistry, MobKind, MobState};
use crate::game::config::{ActorPrototype, AssetCatalog, GameSettings, SpawnConfig};
use crate::game::rng::uniform;
use crate::game::routes::RouteTable;
use crate::physics::{ColliderSet, SpatialQuery};

/// Height of the floor under (x, z), probing down from the spawn probe
/// height.
pub fn floor_height<Q: SpatialQuery>(
    query: &Q,
    colliders: &ColliderSet,
    config: &SpawnConfig,
    ground: Vec2,
) -> Option<f32> {
    let origin = Vec3::new(ground.x, config.probe_height, ground.y);
    query
        .nearest(origin, Vec3::NEG_Y, config.probe_range, colliders.iter())
        .map(|hit| hit.point.y)
}

/// Random spawn spot with floor under it.
///
/// After `max_attempts` misses the last candidate is used at y = 0
/// without validation.
pub fn random_spawn_point<Q: SpatialQuery>(
    query: &Q,
    colliders: &ColliderSet,
    config: &SpawnConfig,
    rng: &mut impl Rng,
) -> Vec3 {
    let extent = config.search_half_extent;
    let mut candidate = Vec2::ZERO;
    for _ in 0..config.max_attempts {
        candidate = Vec2::new(
            uniform(rng, -extent, extent),
            uniform(rng, -extent, extent),
        );
        if let Some(y) = floor_height(query, colliders, config, candidate) {
            return Vec3::new(candidate.x, y, candidate.y);
        }
    }
    warn!(
        attempts = config.max_attempts,
        x = candidate.x,
        z = candidate.y,
        "no floor found for spawn, placing unvalidated"
    );
    Vec3::new(candidate.x, 0.0, candidate.y)
}

fn prototypes(catalog: &AssetCatalog, kind: MobKind) -> &[ActorPrototype] {
    match kind {
        MobKind::Enemy => &catalog.enemies,
        MobKind::Npc => &catalog.npcs,
    }
}

/// Spawn every enemy and NPC for a fresh level.
pub fn populate_level<Q: SpatialQuery>(
    registry: &mut ActorRegistry,
    routes: &RouteTable,
    catalog: &AssetCatalog,
    settings: &GameSettings,
    query: &Q,
    colliders: &ColliderSet,
    rng: &mut impl Rng,
) {
    let spawn = &settings.spawn;
    let counts = [
        (MobKind::Enemy, spawn.enemy_count),
        (MobKind::Npc, spawn.npc_count),
    ];

    for (kind, count) in counts {
        let models = prototypes(catalog, kind);
        for index in 0..count {
            let route = routes.for_mob(&spawn.route_prefix, kind, index);
            let position = match &route {
                Some(route) => {
                    let start = route.point(0);
                    let y = floor_height(query, colliders, spawn, start).unwrap_or(0.0);
                    debug!(?kind, index, "mob assigned to route");
                    Vec3::new(start.x, y, start.y)
                }
                None => random_spawn_point(query, colliders, spawn, rng),
            };

            let shoot_timer = uniform(rng, 0.0, settings.mobs.initial_shoot_delay_max);
            let prototype = if models.is_empty() {
                None
            } else {
                Some(&models[rng.random_range(0..models.len())])
            };

            registry.spawn_mob(
                kind,
                position,
                spawn.mob_size,
                MobState::new(route, shoot_timer),
                prototype,
            );
        }
    }

    info!(
        enemies = spawn.enemy_count,
        npcs = spawn.npc_count,
        "level populated"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::rng::seeded;
    use crate::game::world::WorldObject;
    use crate::physics::{Aabb, SlabRaycaster};

    fn floor() -> ColliderSet {
        ColliderSet::from_boxes([Aabb::new(
            Vec3::new(-100.0, -1.0, -100.0),
            Vec3::new(100.0, 2.0, 100.0),
        )])
    }

    #[test]
    fn test_random_spawn_lands_on_floor() {
        let mut rng = seeded(1);
        let config = SpawnConfig::default();
        let p = random_spawn_point(&SlabRaycaster, &floor(), &config, &mut rng);
        assert_eq!(p.y, 2.0);
        assert!(p.x.abs() <= 40.0 && p.z.abs() <= 40.0);
    }

    #[test]
    fn test_random_spawn_without_floor_is_unvalidated() {
        let mut rng = seeded(1);
        let config = SpawnConfig::default();
        let p = random_spawn_point(&SlabRaycaster, &ColliderSet::default(), &config, &mut rng);
        assert_eq!(p.y, 0.0);
    }

    #[test]
    fn test_routed_mobs_start_on_route() {
        let routes = RouteTable::from_paths(&[WorldObject::path(
            "Route_Enemy1",
            [Vec3::new(12.0, 0.0, -3.0), Vec3::new(20.0, 0.0, -3.0)],
        )]);
        let mut settings = GameSettings::default();
        settings.spawn.enemy_count = 2;
        settings.spawn.npc_count = 1;

        let mut registry = ActorRegistry::new();
        let mut rng = seeded(9);
        populate_level(
            &mut registry,
            &routes,
            &AssetCatalog::default(),
            &settings,
            &SlabRaycaster,
            &floor(),
            &mut rng,
        );

        let mobs = registry.mobs();
        assert_eq!(mobs.len(), 3);
        assert_eq!(mobs[0].position, Vec3::new(12.0, 2.0, -3.0));
        assert!(mobs[0].state.route.is_some());
        assert!(mobs[1].state.route.is_none());
        assert_eq!(mobs[2].kind, MobKind::Npc);
        assert!(mobs.iter().all(|m| m.model.is_none()));
        assert!(mobs.iter().all(|m| (0.0..2.0).contains(&m.state.shoot_timer)));
    }

    #[test]
    fn test_models_drawn_from_catalog() {
        let catalog = AssetCatalog {
            enemies: vec![ActorPrototype::new("grunt"), ActorPrototype::new("brute")],
            npcs: Vec::new(),
            hands: None,
        };
        let mut settings = GameSettings::default();
        settings.spawn.enemy_count = 8;
        settings.spawn.npc_count = 0;

        let mut registry = ActorRegistry::new();
        populate_level(
            &mut registry,
            &RouteTable::default(),
            &catalog,
            &settings,
            &SlabRaycaster,
            &floor(),
            &mut seeded(3),
        );
        assert!(registry.mobs().iter().all(|m| matches!(
            m.model.as_deref(),
            Some("grunt") | Some("brute")
        )));
    }
}
