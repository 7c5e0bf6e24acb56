//! Combat Resolver
//!
//! Bullets are integrated every frame and swept from their previous to
//! their new position against the world colliders plus every live mob.
//! Enemy bullets additionally hit the player by proximity, since the
//! camera has no collision shape of its own.
//!
//! Resolution order per bullet:
//!
//! 1. enemy bullet near the camera: damage the player
//! 2. swept ray hit: a player bullet kills a mob it strikes and raises
//!    aggro; any other hit leaves an impact burst at the hit point
//! 3. out of life: removed silently
//!
//! Particles are purely cosmetic: they drift, age and disappear.

use glam::Vec3;
use rand::Rng;
use tracing::debug;

use crate::game::actors::{ActorId, ActorRegistry};
use crate::game::config::CombatConfig;
use crate::game::rng::centered;
use crate::game::session::GameSession;
use crate::physics::{Collider, ColliderSet, RayHit, ShapeHandle, SpatialQuery};

/// What became of a bullet this frame. Bullets still in flight report
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BulletOutcome {
    /// An enemy bullet reached the player
    HitPlayer { bullet: ActorId },
    /// A player bullet destroyed a mob standing at `at`
    KilledMob {
        bullet: ActorId,
        mob: ActorId,
        at: Vec3,
    },
    /// The bullet struck something it cannot destroy
    Impact { bullet: ActorId, point: Vec3 },
    /// Life ran out with nothing hit
    Expired { bullet: ActorId },
}

struct BulletStep {
    id: ActorId,
    from: Vec3,
    to: Vec3,
    life: f32,
    from_player: bool,
}

/// Bullet and particle driver.
#[derive(Debug, Clone)]
pub struct CombatSystem {
    config: CombatConfig,
}

impl CombatSystem {
    pub fn new(config: CombatConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    /// Fire a player bullet from `muzzle` along `aim`.
    pub fn fire_player(&self, registry: &mut ActorRegistry, muzzle: Vec3, aim: Vec3) -> ActorId {
        let velocity = aim.normalize_or_zero() * self.config.player_bullet_speed;
        registry.spawn_bullet(muzzle, velocity, self.config.bullet_life, true)
    }

    /// Fire a mob bullet from its muzzle at the camera. `None` if the
    /// shooter is gone.
    pub fn fire_mob(
        &self,
        registry: &mut ActorRegistry,
        shooter: ActorId,
        camera: Vec3,
    ) -> Option<ActorId> {
        let muzzle = registry.mob(shooter)?.position + Vec3::Y * self.config.mob_muzzle_height;
        let velocity = (camera - muzzle).normalize_or_zero() * self.config.mob_bullet_speed;
        Some(registry.spawn_bullet(muzzle, velocity, self.config.bullet_life, false))
    }

    /// Spawn a particle burst at `at`.
    pub fn burst(&self, registry: &mut ActorRegistry, at: Vec3, color: u32, rng: &mut impl Rng) {
        let spread = self.config.particle_spread;
        for _ in 0..self.config.burst_particles {
            let velocity = Vec3::new(
                centered(rng, spread),
                centered(rng, spread),
                centered(rng, spread),
            );
            registry.spawn_particle(at, velocity, self.config.particle_life, color);
        }
    }

    /// Advance and resolve every live bullet.
    #[allow(clippy::too_many_arguments)]
    pub fn update_bullets<Q: SpatialQuery>(
        &self,
        registry: &mut ActorRegistry,
        session: &mut GameSession,
        camera: Vec3,
        query: &Q,
        colliders: &ColliderSet,
        rng: &mut impl Rng,
        delta: f32,
    ) -> Vec<BulletOutcome> {
        // Mobs killed earlier in the frame keep their box here; their
        // handle no longer resolves to an owner and is skipped.
        let targets: Vec<Collider> = colliders
            .iter()
            .cloned()
            .chain(registry.mob_colliders())
            .collect();

        let steps: Vec<BulletStep> = registry
            .bullets_mut()
            .iter_mut()
            .map(|bullet| {
                let from = bullet.position;
                bullet.position += bullet.velocity * delta;
                bullet.life -= delta;
                BulletStep {
                    id: bullet.id,
                    from,
                    to: bullet.position,
                    life: bullet.life,
                    from_player: bullet.from_player,
                }
            })
            .collect();

        let mut outcomes = Vec::new();
        for step in steps {
            if let Some(outcome) =
                self.resolve(&step, registry, session, camera, query, &targets, rng)
            {
                registry.despawn(step.id);
                outcomes.push(outcome);
            }
        }
        outcomes
    }

    #[allow(clippy::too_many_arguments)]
    fn resolve<Q: SpatialQuery>(
        &self,
        step: &BulletStep,
        registry: &mut ActorRegistry,
        session: &mut GameSession,
        camera: Vec3,
        query: &Q,
        targets: &[Collider],
        rng: &mut impl Rng,
    ) -> Option<BulletOutcome> {
        let bullet = step.id;

        if !step.from_player && step.to.distance(camera) < self.config.player_hit_radius {
            session.damage_player(self.config.mob_bullet_damage);
            return Some(BulletOutcome::HitPlayer { bullet });
        }

        let travel = step.to - step.from;
        let hits = query.intersect(step.from, travel, travel.length(), targets);
        let struck = hits.into_iter().find_map(|hit| match hit.shape {
            ShapeHandle::World(_) => Some((hit, None)),
            shape => registry.owner_of(shape).map(|mob| (hit, Some(mob))),
        });

        match struck {
            Some((_, Some(mob))) if step.from_player => {
                let at = registry.mob(mob).map(|m| m.position)?;
                session.trigger_aggro();
                registry.despawn(mob);
                debug!(?mob, "mob destroyed");
                self.burst(registry, at, self.config.kill_burst_color, rng);
                Some(BulletOutcome::KilledMob { bullet, mob, at })
            }
            Some((RayHit { point, .. }, _)) => {
                let color = if step.from_player {
                    self.config.impact_color
                } else {
                    self.config.enemy_impact_color
                };
                self.burst(registry, point, color, rng);
                Some(BulletOutcome::Impact { bullet, point })
            }
            None if step.life <= 0.0 => Some(BulletOutcome::Expired { bullet }),
            None => None,
        }
    }

    /// Advance every particle and remove the ones that ran out of life.
    pub fn update_particles(&self, registry: &mut ActorRegistry, delta: f32) {
        let expired: Vec<ActorId> = registry
            .particles_mut()
            .iter_mut()
            .filter_map(|particle| {
                particle.life -= delta;
                particle.position += particle.velocity * delta;
                (particle.life <= 0.0).then_some(particle.id)
            })
            .collect();
        for id in expired {
            registry.despawn(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::actors::{MobKind, MobState};
    use crate::game::events::UiEvent;
    use crate::game::rng::seeded;
    use crate::physics::{Aabb, SlabRaycaster};

    const DT: f32 = 1.0 / 60.0;
    const SIZE: Vec3 = Vec3::new(1.0, 2.0, 1.0);
    const CAMERA: Vec3 = Vec3::new(0.0, 1.6, 0.0);

    fn combat() -> CombatSystem {
        CombatSystem::new(CombatConfig::default())
    }

    fn session() -> GameSession {
        let mut session = GameSession::new(100.0);
        session.resume();
        session
    }

    fn wall() -> ColliderSet {
        ColliderSet::from_boxes([Aabb::new(
            Vec3::new(-5.0, 0.0, -21.0),
            Vec3::new(5.0, 5.0, -20.0),
        )])
    }

    #[test]
    fn test_player_bullet_kills_mob_and_raises_aggro() {
        let mut registry = ActorRegistry::new();
        let mut session = session();
        let mob = registry.spawn_mob(
            MobKind::Enemy,
            Vec3::new(0.0, 0.0, -3.0),
            SIZE,
            MobState::new(None, 1.0),
            None,
        );
        let bullet = combat().fire_player(&mut registry, Vec3::new(0.0, 1.0, -1.0), Vec3::NEG_Z);

        let outcomes = combat().update_bullets(
            &mut registry,
            &mut session,
            CAMERA,
            &SlabRaycaster,
            &ColliderSet::default(),
            &mut seeded(0),
            DT,
        );

        assert_eq!(
            outcomes,
            vec![BulletOutcome::KilledMob {
                bullet,
                mob,
                at: Vec3::new(0.0, 0.0, -3.0)
            }]
        );
        assert!(session.is_aggro());
        assert!(registry.mobs().is_empty());
        assert!(registry.bullets().is_empty());
        assert_eq!(registry.particles().len(), 6);
        assert!(registry.particles().iter().all(|p| p.color == 0xff0000));
    }

    #[test]
    fn test_second_bullet_passes_through_dead_mob_to_wall() {
        let mut registry = ActorRegistry::new();
        let mut session = session();
        registry.spawn_mob(
            MobKind::Npc,
            Vec3::new(0.0, 0.0, -3.0),
            SIZE,
            MobState::new(None, 1.0),
            None,
        );
        let wall = ColliderSet::from_boxes([Aabb::new(
            Vec3::new(-5.0, 0.0, -2.7),
            Vec3::new(5.0, 5.0, -2.6),
        )]);
        let first = combat().fire_player(&mut registry, Vec3::new(0.0, 1.0, -1.0), Vec3::NEG_Z);
        let second = combat().fire_player(&mut registry, Vec3::new(0.0, 1.0, -1.0), Vec3::NEG_Z);

        let outcomes = combat().update_bullets(
            &mut registry,
            &mut session,
            CAMERA,
            &SlabRaycaster,
            &wall,
            &mut seeded(0),
            DT,
        );

        assert!(matches!(outcomes[0], BulletOutcome::KilledMob { bullet, .. } if bullet == first));
        assert!(matches!(outcomes[1], BulletOutcome::Impact { bullet, .. } if bullet == second));
    }

    #[test]
    fn test_enemy_bullet_damages_player_by_proximity() {
        let mut registry = ActorRegistry::new();
        let mut session = session();
        registry.spawn_bullet(Vec3::new(0.0, 1.6, -1.2), Vec3::new(0.0, 0.0, 30.0), 3.0, false);

        let outcomes = combat().update_bullets(
            &mut registry,
            &mut session,
            CAMERA,
            &SlabRaycaster,
            &ColliderSet::default(),
            &mut seeded(0),
            DT,
        );

        assert!(matches!(outcomes[..], [BulletOutcome::HitPlayer { .. }]));
        assert_eq!(session.health(), 90.0);
        assert!(registry.bullets().is_empty());
        assert!(session.drain_ui().contains(&UiEvent::HitFlash { duration: 0.2 }));
    }

    #[test]
    fn test_player_bullet_never_hits_player() {
        let mut registry = ActorRegistry::new();
        let mut session = session();
        registry.spawn_bullet(CAMERA, Vec3::new(0.0, 0.0, -100.0), 3.0, true);
        combat().update_bullets(
            &mut registry,
            &mut session,
            CAMERA,
            &SlabRaycaster,
            &ColliderSet::default(),
            &mut seeded(0),
            DT,
        );
        assert_eq!(session.health(), 100.0);
        assert_eq!(registry.bullets().len(), 1);
    }

    #[test]
    fn test_enemy_bullet_impact_is_muted() {
        let mut registry = ActorRegistry::new();
        let mut session = session();
        registry.spawn_bullet(Vec3::new(0.0, 1.0, -19.8), Vec3::new(0.0, 0.0, -30.0), 3.0, false);
        let outcomes = combat().update_bullets(
            &mut registry,
            &mut session,
            Vec3::new(0.0, 1.6, 50.0),
            &SlabRaycaster,
            &wall(),
            &mut seeded(0),
            DT,
        );
        match outcomes[..] {
            [BulletOutcome::Impact { point, .. }] => assert!((point.z + 20.0).abs() < 1e-4),
            ref other => panic!("unexpected outcomes {other:?}"),
        }
        assert!(registry.particles().iter().all(|p| p.color == 0x555555));
        assert!(!session.is_aggro());
    }

    #[test]
    fn test_enemy_bullet_does_not_kill_mobs() {
        let mut registry = ActorRegistry::new();
        let mut session = session();
        registry.spawn_mob(
            MobKind::Enemy,
            Vec3::new(0.0, 0.0, -3.0),
            SIZE,
            MobState::new(None, 1.0),
            None,
        );
        registry.spawn_bullet(Vec3::new(0.0, 1.0, -1.0), Vec3::new(0.0, 0.0, -100.0), 3.0, false);
        combat().update_bullets(
            &mut registry,
            &mut session,
            Vec3::new(0.0, 1.6, 50.0),
            &SlabRaycaster,
            &ColliderSet::default(),
            &mut seeded(0),
            DT,
        );
        assert_eq!(registry.mobs().len(), 1);
        assert!(registry.bullets().is_empty());
        assert!(!session.is_aggro());
    }

    #[test]
    fn test_bullet_expires_exactly_once() {
        let mut registry = ActorRegistry::new();
        let mut session = session();
        let bullet = registry.spawn_bullet(Vec3::new(0.0, 50.0, 0.0), Vec3::X, 0.05, true);
        let mut expired = 0;
        for _ in 0..10 {
            let outcomes = combat().update_bullets(
                &mut registry,
                &mut session,
                CAMERA,
                &SlabRaycaster,
                &ColliderSet::default(),
                &mut seeded(0),
                DT,
            );
            expired += outcomes
                .iter()
                .filter(|o| **o == BulletOutcome::Expired { bullet })
                .count();
        }
        assert_eq!(expired, 1);
        assert!(registry.bullets().is_empty());
    }

    #[test]
    fn test_mob_fires_from_muzzle_toward_camera() {
        let mut registry = ActorRegistry::new();
        let mob = registry.spawn_mob(
            MobKind::Enemy,
            Vec3::new(10.0, 0.0, 0.0),
            SIZE,
            MobState::new(None, 1.0),
            None,
        );
        let id = combat()
            .fire_mob(&mut registry, mob, Vec3::new(0.0, 1.2, 0.0))
            .unwrap();
        let bullet = registry.bullets().iter().find(|b| b.id == id).unwrap();
        assert_eq!(bullet.position, Vec3::new(10.0, 1.2, 0.0));
        assert!((bullet.velocity - Vec3::new(-30.0, 0.0, 0.0)).length() < 1e-4);
        assert!(!bullet.from_player);

        registry.despawn(mob);
        assert!(combat().fire_mob(&mut registry, mob, Vec3::ZERO).is_none());
    }

    #[test]
    fn test_particles_decay() {
        let mut registry = ActorRegistry::new();
        combat().burst(&mut registry, Vec3::ZERO, 0xffffaa, &mut seeded(1));
        assert_eq!(registry.particles().len(), 6);
        for particle in registry.particles() {
            assert!(particle.velocity.abs().max_element() <= 2.5);
        }
        for _ in 0..29 {
            combat().update_particles(&mut registry, DT);
        }
        assert_eq!(registry.particles().len(), 6);
        for _ in 0..2 {
            combat().update_particles(&mut registry, DT);
        }
        assert!(registry.particles().is_empty());
    }
}
