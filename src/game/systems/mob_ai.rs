//! Mob AI
//!
//! One pass over every live mob per frame. Each mob is moved by exactly
//! one behavior, picked in priority order:
//!
//! 1. **Pursuit**: an enemy while the session is aggroed faces the player,
//!    closes in down to a standoff distance and fires on a cooldown.
//! 2. **Patrol**: a mob with a route walks to its current waypoint and
//!    moves on to the next one once close enough.
//! 3. **Wander**: everyone else drifts with a random velocity that is
//!    re-rolled every few seconds.
//!
//! Mobs farther than the cull radius from the player are skipped
//! entirely. After moving, a mob is snapped to the floor under it (or
//! falls when there is none) and its looping clip is chosen.

use glam::Vec3;
use rand::Rng;

use crate::game::actors::{ActorId, ActorRegistry, AggroState, Mob, MobKind};
use crate::game::config::MobAiConfig;
use crate::game::rng::{centered, uniform};
use crate::physics::{ColliderSet, SpatialQuery, facing_yaw, ground_point};

/// An enemy wants to fire at the player this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShootRequest {
    pub shooter: ActorId,
}

/// Which behavior moved a mob this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Pursuit,
    Patrol,
    Wander,
}

/// Per-frame mob driver.
#[derive(Debug, Clone)]
pub struct MobAiSystem {
    config: MobAiConfig,
}

impl MobAiSystem {
    pub fn new(config: MobAiConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MobAiConfig {
        &self.config
    }

    /// Pick the behavior that governs `mob` this frame.
    pub fn behavior_for(mob: &Mob, aggro: bool) -> Behavior {
        if mob.kind == MobKind::Enemy && aggro {
            Behavior::Pursuit
        } else if mob.state.route.is_some() {
            Behavior::Patrol
        } else {
            Behavior::Wander
        }
    }

    /// Advance every mob by `delta` seconds.
    ///
    /// `player` is the camera position. Returns the shots enemies want
    /// fired; the combat system carries them out.
    #[allow(clippy::too_many_arguments)]
    pub fn update<Q: SpatialQuery>(
        &self,
        registry: &mut ActorRegistry,
        aggro: bool,
        player: Vec3,
        query: &Q,
        colliders: &ColliderSet,
        rng: &mut impl Rng,
        delta: f32,
    ) -> Vec<ShootRequest> {
        let mut shots = Vec::new();

        for mob in registry.mobs_mut() {
            if mob.position.distance(player) > self.config.cull_radius {
                continue;
            }
            if aggro {
                mob.state.aggro = AggroState::Aggro;
            }

            let behavior = Self::behavior_for(mob, aggro);
            let moving = match behavior {
                Behavior::Pursuit => self.pursue(mob, player, rng, delta, &mut shots),
                Behavior::Patrol => self.patrol(mob, delta),
                Behavior::Wander => self.wander(mob, rng, delta),
            };

            self.follow_ground(mob, query, colliders, delta);
            Self::choose_clip(mob, behavior, moving);
        }

        shots
    }

    fn pursue(
        &self,
        mob: &mut Mob,
        player: Vec3,
        rng: &mut impl Rng,
        delta: f32,
        shots: &mut Vec<ShootRequest>,
    ) -> bool {
        let to_player = player - mob.position;
        let flat = Vec3::new(to_player.x, 0.0, to_player.z);
        if let Some(yaw) = facing_yaw(flat) {
            mob.yaw = yaw;
        }

        let mut moving = false;
        if to_player.length() > self.config.standoff_distance {
            mob.position += flat.normalize_or_zero() * self.config.pursuit_speed * delta;
            moving = true;
        }

        mob.state.shoot_timer -= delta;
        if mob.state.shoot_timer <= 0.0 {
            shots.push(ShootRequest { shooter: mob.id });
            mob.state.shoot_timer = uniform(
                rng,
                self.config.shoot_interval_min,
                self.config.shoot_interval_max,
            );
            if let Some(clips) = mob.animated() {
                clips.play_once("shoot");
            }
        }
        moving
    }

    fn patrol(&self, mob: &mut Mob, delta: f32) -> bool {
        let Some(route) = &mob.state.route else {
            return false;
        };

        let index = mob.state.waypoint_index;
        let offset = route.point(index) - ground_point(mob.position);
        let distance = offset.length();

        if distance < self.config.waypoint_threshold {
            mob.state.waypoint_index = route.next_index(index);
            return false;
        }

        // Never step past the waypoint.
        let step = (self.config.patrol_speed * delta).min(distance);
        let direction = offset / distance;
        mob.position += Vec3::new(direction.x, 0.0, direction.y) * step;
        if let Some(yaw) = facing_yaw(Vec3::new(direction.x, 0.0, direction.y)) {
            mob.yaw = yaw;
        }
        true
    }

    fn wander(&self, mob: &mut Mob, rng: &mut impl Rng, delta: f32) -> bool {
        let state = &mut mob.state;
        state.wander_change_timer -= delta;
        if state.wander_change_timer <= 0.0 {
            let spread = self.config.wander_spread;
            state.wander_velocity = Vec3::new(centered(rng, spread), 0.0, centered(rng, spread));
            state.wander_change_timer = uniform(
                rng,
                self.config.wander_interval_min,
                self.config.wander_interval_max,
            );
        }

        mob.position += state.wander_velocity * delta;
        if let Some(yaw) = facing_yaw(state.wander_velocity) {
            mob.yaw = yaw;
        }
        true
    }

    fn follow_ground<Q: SpatialQuery>(
        &self,
        mob: &mut Mob,
        query: &Q,
        colliders: &ColliderSet,
        delta: f32,
    ) {
        let origin = mob.position + Vec3::Y * self.config.ground_probe_height;
        match query.nearest(origin, Vec3::NEG_Y, self.config.ground_probe_range, colliders.iter()) {
            Some(hit) => mob.position.y = hit.point.y,
            None => mob.position.y -= self.config.fallback_gravity * delta,
        }
    }

    fn choose_clip(mob: &mut Mob, behavior: Behavior, moving: bool) {
        let Some(clips) = mob.animated() else {
            return;
        };
        if !moving {
            clips.play_loop("Idle");
        } else if behavior == Behavior::Pursuit {
            if !clips.play_loop("Run") {
                clips.play_loop("Walk");
            }
        } else {
            clips.play_loop("Walk");
        }
    }
}
