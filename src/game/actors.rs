//! Actor Registry
//!
//! Owns every dynamic actor: mobs, bullets and particles. Each kind lives
//! in its own list, and every actor carries a registry-unique [`ActorId`]
//! that is never reused within a registry's lifetime.
//!
//! Mobs are the only dynamic actors that can be struck. Each mob owns one
//! [`ShapeHandle::Dynamic`] collision shape; the registry keeps a flat
//! handle → owner map so a ray hit resolves to its mob in one lookup.
//!
//! Spawns and despawns are recorded as [`GameEvent`]s for the host to
//! drain.

use std::collections::HashMap;
use std::sync::Arc;

use glam::Vec3;
use tracing::debug;

use crate::game::animation::{AnimatedActor, ClipSet};
use crate::game::config::ActorPrototype;
use crate::game::events::{EventQueue, GameEvent};
use crate::game::routes::Route;
use crate::physics::{Aabb, Collider, ShapeHandle};

/// Registry-unique actor identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub u32);

/// Category of an actor as seen by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorKind {
    Player,
    Enemy,
    Npc,
    Bullet,
    Particle,
}

/// The two mob categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MobKind {
    /// Hostile: pursues and fires once aggroed
    Enemy,
    /// Bystander: patrols or wanders
    Npc,
}

impl MobKind {
    pub fn is_enemy(self) -> bool {
        self == MobKind::Enemy
    }

    /// Category part of a route name.
    pub fn route_label(self) -> &'static str {
        match self {
            MobKind::Enemy => "Enemy",
            MobKind::Npc => "NPC",
        }
    }

    /// Color of the placeholder box used when no model loaded.
    pub fn placeholder_color(self) -> u32 {
        match self {
            MobKind::Enemy => 0xff0000,
            MobKind::Npc => 0x00ff00,
        }
    }
}

impl From<MobKind> for ActorKind {
    fn from(kind: MobKind) -> Self {
        match kind {
            MobKind::Enemy => ActorKind::Enemy,
            MobKind::Npc => ActorKind::Npc,
        }
    }
}

/// Per-mob alert state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AggroState {
    #[default]
    Passive,
    Aggro,
}

/// Behavior state of a mob.
#[derive(Debug, Clone, PartialEq)]
pub struct MobState {
    /// Assigned patrol route, shared with the route table
    pub route: Option<Arc<Route>>,
    /// Waypoint currently walked toward
    pub waypoint_index: usize,
    /// Horizontal velocity while wandering
    pub wander_velocity: Vec3,
    /// Seconds until the next wander direction change
    pub wander_change_timer: f32,
    /// Seconds until the next shot (enemies only)
    pub shoot_timer: f32,
    /// Mirrors the session's aggro flag
    pub aggro: AggroState,
}

impl MobState {
    pub fn new(route: Option<Arc<Route>>, shoot_timer: f32) -> Self {
        Self {
            route,
            waypoint_index: 0,
            wander_velocity: Vec3::ZERO,
            wander_change_timer: 0.0,
            shoot_timer,
            aggro: AggroState::Passive,
        }
    }
}

/// An enemy or NPC.
#[derive(Debug, Clone)]
pub struct Mob {
    pub id: ActorId,
    pub kind: MobKind,
    /// Feet position
    pub position: Vec3,
    /// Facing angle about +Y; 0 faces +Z
    pub yaw: f32,
    /// Bounding box size (width, height, depth) before `scale`
    pub size: Vec3,
    /// Model name, `None` for a placeholder box
    pub model: Option<String>,
    pub scale: f32,
    pub state: MobState,
    shape: ShapeHandle,
    animation: Option<ClipSet>,
}

impl Mob {
    pub fn shape(&self) -> ShapeHandle {
        self.shape
    }

    /// Box standing on the mob's feet, sized to the scaled model.
    pub fn bounds(&self) -> Aabb {
        let size = self.size * self.scale;
        Aabb::standing_on(self.position, size.x, size.y, size.z)
    }

    pub fn collider(&self) -> Collider {
        Collider::new(self.shape, self.bounds())
    }

    /// Animation capability, absent for actors without clips.
    pub fn animation(&self) -> Option<&ClipSet> {
        self.animation.as_ref()
    }

    pub fn animated(&mut self) -> Option<&mut dyn AnimatedActor> {
        self.animation
            .as_mut()
            .map(|clips| clips as &mut dyn AnimatedActor)
    }

    pub(crate) fn advance_animation(&mut self, delta: f32) {
        if let Some(clips) = &mut self.animation {
            clips.advance(delta);
        }
    }
}

/// A projectile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bullet {
    pub id: ActorId,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Seconds remaining
    pub life: f32,
    /// Fired by the player rather than a mob
    pub from_player: bool,
}

/// A cosmetic burst fragment. Never collides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub id: ActorId,
    pub position: Vec3,
    pub velocity: Vec3,
    pub life: f32,
    /// RGB color
    pub color: u32,
}

/// Render-facing view of one actor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorView {
    pub id: ActorId,
    pub kind: ActorKind,
    pub position: Vec3,
    pub yaw: f32,
}

/// Owner of all dynamic actors.
#[derive(Debug, Default)]
pub struct ActorRegistry {
    mobs: Vec<Mob>,
    bullets: Vec<Bullet>,
    particles: Vec<Particle>,
    shape_owners: HashMap<ShapeHandle, ActorId>,
    next_id: u32,
    next_shape: u32,
    events: EventQueue<GameEvent>,
}

impl ActorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> ActorId {
        let id = ActorId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a mob. Without a prototype it is a placeholder box with no
    /// animation.
    pub fn spawn_mob(
        &mut self,
        kind: MobKind,
        position: Vec3,
        size: Vec3,
        state: MobState,
        prototype: Option<&ActorPrototype>,
    ) -> ActorId {
        let id = self.allocate_id();
        let shape = ShapeHandle::Dynamic(self.next_shape);
        self.next_shape += 1;
        self.shape_owners.insert(shape, id);

        let (model, scale, animation) = match prototype {
            Some(proto) => (
                Some(proto.name.clone()),
                proto.scale,
                ClipSet::new(proto.clips.clone()),
            ),
            None => {
                debug!(?kind, "no model loaded, spawning placeholder");
                (None, 1.0, None)
            }
        };

        self.mobs.push(Mob {
            id,
            kind,
            position,
            yaw: 0.0,
            size,
            model,
            scale,
            state,
            shape,
            animation,
        });
        self.events.push(GameEvent::Spawned {
            id,
            kind: kind.into(),
            position,
        });
        id
    }

    pub fn spawn_bullet(&mut self, position: Vec3, velocity: Vec3, life: f32, from_player: bool) -> ActorId {
        let id = self.allocate_id();
        self.bullets.push(Bullet {
            id,
            position,
            velocity,
            life,
            from_player,
        });
        self.events.push(GameEvent::Spawned {
            id,
            kind: ActorKind::Bullet,
            position,
        });
        id
    }

    pub fn spawn_particle(&mut self, position: Vec3, velocity: Vec3, life: f32, color: u32) -> ActorId {
        let id = self.allocate_id();
        self.particles.push(Particle {
            id,
            position,
            velocity,
            life,
            color,
        });
        self.events.push(GameEvent::Spawned {
            id,
            kind: ActorKind::Particle,
            position,
        });
        id
    }

    /// Remove an actor of any kind.
    ///
    /// Returns `false` when no such actor is alive, so removing twice is
    /// harmless.
    pub fn despawn(&mut self, id: ActorId) -> bool {
        let kind = if let Some(i) = self.mobs.iter().position(|m| m.id == id) {
            let mob = self.mobs.remove(i);
            self.shape_owners.remove(&mob.shape);
            ActorKind::from(mob.kind)
        } else if let Some(i) = self.bullets.iter().position(|b| b.id == id) {
            self.bullets.remove(i);
            ActorKind::Bullet
        } else if let Some(i) = self.particles.iter().position(|p| p.id == id) {
            self.particles.remove(i);
            ActorKind::Particle
        } else {
            return false;
        };
        self.events.push(GameEvent::Despawned { id, kind });
        true
    }

    /// Remove every actor (level restart).
    pub fn clear(&mut self) {
        let ids: Vec<ActorId> = self
            .mobs
            .iter()
            .map(|m| m.id)
            .chain(self.bullets.iter().map(|b| b.id))
            .chain(self.particles.iter().map(|p| p.id))
            .collect();
        for id in ids {
            self.despawn(id);
        }
    }

    /// Mob owning a dynamic shape. `None` for world shapes and for shapes
    /// of despawned mobs.
    pub fn owner_of(&self, shape: ShapeHandle) -> Option<ActorId> {
        self.shape_owners.get(&shape).copied()
    }

    pub fn mob(&self, id: ActorId) -> Option<&Mob> {
        self.mobs.iter().find(|m| m.id == id)
    }

    pub fn mob_mut(&mut self, id: ActorId) -> Option<&mut Mob> {
        self.mobs.iter_mut().find(|m| m.id == id)
    }

    pub fn mobs(&self) -> &[Mob] {
        &self.mobs
    }

    pub fn mobs_mut(&mut self) -> &mut [Mob] {
        &mut self.mobs
    }

    /// Collision shapes of every live mob.
    pub fn mob_colliders(&self) -> impl Iterator<Item = Collider> + '_ {
        self.mobs.iter().map(Mob::collider)
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn bullets_mut(&mut self) -> &mut [Bullet] {
        &mut self.bullets
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Number of live actors of all kinds.
    pub fn len(&self) -> usize {
        self.mobs.len() + self.bullets.len() + self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Position and facing of every live actor.
    pub fn views(&self) -> Vec<ActorView> {
        let mobs = self.mobs.iter().map(|m| ActorView {
            id: m.id,
            kind: m.kind.into(),
            position: m.position,
            yaw: m.yaw,
        });
        let bullets = self.bullets.iter().map(|b| ActorView {
            id: b.id,
            kind: ActorKind::Bullet,
            position: b.position,
            yaw: 0.0,
        });
        let particles = self.particles.iter().map(|p| ActorView {
            id: p.id,
            kind: ActorKind::Particle,
            position: p.position,
            yaw: 0.0,
        });
        mobs.chain(bullets).chain(particles).collect()
    }

    /// Take the spawn/despawn events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::ClipDesc;
    use crate::game::events::MAX_PENDING_EVENTS;
    use crate::physics::{SlabRaycaster, SpatialQuery};

    const MOB_SIZE: Vec3 = Vec3::new(1.0, 2.0, 1.0);

    fn spawn_enemy(registry: &mut ActorRegistry, x: f32) -> ActorId {
        registry.spawn_mob(
            MobKind::Enemy,
            Vec3::new(x, 0.0, 0.0),
            MOB_SIZE,
            MobState::new(None, 1.0),
            None,
        )
    }

    #[test]
    fn test_ids_are_unique_across_kinds() {
        let mut registry = ActorRegistry::new();
        let a = spawn_enemy(&mut registry, 0.0);
        let b = registry.spawn_bullet(Vec3::ZERO, Vec3::X, 3.0, true);
        let c = registry.spawn_particle(Vec3::ZERO, Vec3::Y, 0.5, 0xff0000);
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_shape_resolves_to_owner() {
        let mut registry = ActorRegistry::new();
        let id = spawn_enemy(&mut registry, 4.0);
        let shape = registry.mob(id).unwrap().shape();
        assert_eq!(registry.owner_of(shape), Some(id));
        assert_eq!(registry.owner_of(ShapeHandle::World(0)), None);
    }

    #[test]
    fn test_despawn_is_exactly_once() {
        let mut registry = ActorRegistry::new();
        let id = spawn_enemy(&mut registry, 0.0);
        let shape = registry.mob(id).unwrap().shape();
        registry.drain_events();

        assert!(registry.despawn(id));
        assert!(!registry.despawn(id));
        assert!(registry.owner_of(shape).is_none());
        assert_eq!(
            registry.drain_events(),
            vec![GameEvent::Despawned {
                id,
                kind: ActorKind::Enemy
            }]
        );
    }

    #[test]
    fn test_ids_not_reused_after_despawn() {
        let mut registry = ActorRegistry::new();
        let first = spawn_enemy(&mut registry, 0.0);
        registry.despawn(first);
        let second = spawn_enemy(&mut registry, 0.0);
        assert_ne!(first, second);
    }

    #[test]
    fn test_clear_removes_everything() {
        let mut registry = ActorRegistry::new();
        spawn_enemy(&mut registry, 0.0);
        registry.spawn_bullet(Vec3::ZERO, Vec3::X, 3.0, false);
        registry.spawn_particle(Vec3::ZERO, Vec3::Y, 0.5, 0);
        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(registry.mob_colliders().count(), 0);
    }

    #[test]
    fn test_mob_collider_stands_on_feet() {
        let mut registry = ActorRegistry::new();
        let id = spawn_enemy(&mut registry, 5.0);
        let bounds = registry.mob(id).unwrap().bounds();
        assert_eq!(bounds.min, Vec3::new(4.5, 0.0, -0.5));
        assert_eq!(bounds.max, Vec3::new(5.5, 2.0, 0.5));
    }

    #[test]
    fn test_animation_capability_follows_prototype() {
        let mut registry = ActorRegistry::new();
        let placeholder = spawn_enemy(&mut registry, 0.0);
        let proto = ActorPrototype::new("soldier").with_clips([ClipDesc::new("Walk", 1.0)]);
        let modeled = registry.spawn_mob(
            MobKind::Npc,
            Vec3::ZERO,
            MOB_SIZE,
            MobState::new(None, 0.0),
            Some(&proto),
        );

        assert!(registry.mob_mut(placeholder).unwrap().animated().is_none());
        let mob = registry.mob_mut(modeled).unwrap();
        assert_eq!(mob.model.as_deref(), Some("soldier"));
        assert!(mob.animated().unwrap().play_loop("walk"));
    }

    #[test]
    fn test_undrained_events_are_capped() {
        let mut registry = ActorRegistry::new();
        for _ in 0..MAX_PENDING_EVENTS + 904 {
            let id = registry.spawn_particle(Vec3::ZERO, Vec3::Y, 0.0, 0xffffff);
            registry.despawn(id);
        }
        let events = registry.drain_events();
        assert_eq!(events.len(), MAX_PENDING_EVENTS);
        assert!(matches!(events.last(), Some(GameEvent::Despawned { kind: ActorKind::Particle, .. })));
        assert!(registry.drain_events().is_empty());
    }

    #[test]
    fn test_model_scale_grows_hit_box() {
        let mut registry = ActorRegistry::new();
        let mut proto = ActorPrototype::new("giant");
        proto.scale = 2.0;
        let id = registry.spawn_mob(
            MobKind::Enemy,
            Vec3::new(0.0, 0.0, -5.0),
            MOB_SIZE,
            MobState::new(None, 1.0),
            Some(&proto),
        );

        let mob = registry.mob(id).unwrap();
        let bounds = mob.bounds();
        assert_eq!(bounds.max.y - bounds.min.y, 4.0);
        assert_eq!(bounds.max.x - bounds.min.x, 2.0);

        // Above the unscaled height but inside the scaled box.
        let collider = mob.collider();
        let hit = SlabRaycaster.nearest(Vec3::new(0.0, 3.0, 0.0), Vec3::NEG_Z, 10.0, [&collider]);
        assert_eq!(hit.map(|h| h.shape), Some(mob.shape()));
    }
}
