//! First-person Player Controller
//!
//! Integrates the camera position every frame against arbitrary world
//! geometry using three kinds of ray probes.
//!
//! # Physics Model
//!
//! - Horizontal velocity is rebuilt from input each tick (no inertia).
//! - Each horizontal axis is probed on its own; a blocked axis simply
//!   does not move, so the player slides along walls on the other axis.
//! - Vertical velocity accumulates gravity and jump impulses. A downward
//!   probe snaps the eye to `floor + stance height` when close enough and
//!   not moving upward.
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut player = PlayerController::new(PlayerPhysicsConfig::default(), Vec3::new(0.0, 10.0, 0.0));
//!
//! // Each frame:
//! let outcome = player.tick(delta, &keyboard.movement, &SlabRaycaster, &world);
//! if outcome.fell_out_of_world {
//!     session.damage_player(player.config().fall_damage);
//! }
//! ```

use glam::{Mat4, Quat, Vec3};

use super::config::PlayerPhysicsConfig;
use super::stance::Stance;
use crate::input::MovementKeys;
use crate::physics::{ColliderSet, SpatialQuery};

/// Pitch limit (just short of straight up/down)
const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Axis displacements below this are not probed or applied.
const MIN_AXIS_STEP: f32 = 0.0001;

/// Side effects of one controller tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerTick {
    /// The player fell below the kill depth and was put back at the respawn point
    pub fell_out_of_world: bool,
    /// The ground probe snapped the player onto a floor this tick
    pub landed: bool,
}

/// First-person player body. `position` is the camera (eye) position.
#[derive(Debug, Clone)]
pub struct PlayerController {
    /// Eye position in world space
    pub position: Vec3,
    /// Horizontal part rebuilt from input each tick, vertical part accumulated
    pub velocity: Vec3,
    /// Heading in radians; 0 looks down -Z, positive turns toward +X
    pub yaw: f32,
    /// Look elevation in radians, positive is up
    pub pitch: f32,
    stance: Stance,
    grounded: bool,
    config: PlayerPhysicsConfig,
}

impl PlayerController {
    /// Create a controller with the eye at `spawn`, airborne.
    pub fn new(config: PlayerPhysicsConfig, spawn: Vec3) -> Self {
        Self {
            position: spawn,
            velocity: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            stance: Stance::Standing,
            grounded: false,
            config,
        }
    }

    pub fn config(&self) -> &PlayerPhysicsConfig {
        &self.config
    }

    pub fn stance(&self) -> Stance {
        self.stance
    }

    /// Whether the last ground probe put the player on a floor.
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Jumping is only allowed from the ground.
    pub fn can_jump(&self) -> bool {
        self.grounded
    }

    /// Eye height the ground snap currently targets.
    pub fn target_height(&self) -> f32 {
        self.stance.height(&self.config)
    }

    /// Apply a jump impulse if grounded. Returns whether the jump happened.
    pub fn try_jump(&mut self) -> bool {
        if !self.can_jump() {
            return false;
        }
        self.velocity.y = self.config.jump_force;
        self.grounded = false;
        true
    }

    /// Apply a mouse-look delta.
    pub fn look(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.yaw = (self.yaw + yaw_delta).rem_euclid(std::f32::consts::TAU);
        self.pitch = (self.pitch + pitch_delta).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Put the player back at `spawn`, standing still.
    pub fn reset(&mut self, spawn: Vec3) {
        self.position = spawn;
        self.velocity = Vec3::ZERO;
        self.stance = Stance::Standing;
        self.grounded = false;
    }

    /// Camera orientation: rotates the local -Z view axis onto [`Self::forward`].
    pub fn camera_rotation(&self) -> Quat {
        Quat::from_rotation_y(-self.yaw) * Quat::from_rotation_x(self.pitch)
    }

    /// Camera local-to-world transform.
    pub fn camera_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.camera_rotation(), self.position)
    }

    /// Full view direction, including pitch.
    pub fn forward(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(sin_yaw * cos_pitch, sin_pitch, -cos_yaw * cos_pitch)
    }

    /// Horizontal forward/right basis used for walking.
    pub fn walk_basis(&self) -> (Vec3, Vec3) {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let forward = Vec3::new(sin_yaw, 0.0, -cos_yaw);
        let right = forward.cross(Vec3::Y).normalize();
        (forward, right)
    }

    /// Advance one frame.
    pub fn tick<Q: SpatialQuery>(
        &mut self,
        delta: f32,
        keys: &MovementKeys,
        query: &Q,
        world: &ColliderSet,
    ) -> PlayerTick {
        let dt = delta.max(0.0);
        self.stance = Stance::from_crouch(keys.crouch);

        self.velocity.y -= self.config.gravity * dt;

        let (forward, right) = self.walk_basis();
        let speed = self.stance.speed(&self.config);
        let horizontal = (forward * keys.forward_axis() as f32 + right * keys.right_axis() as f32) * speed;
        self.velocity.x = horizontal.x;
        self.velocity.z = horizontal.z;

        let intended_x = self.velocity.x * dt;
        if intended_x.abs() > MIN_AXIS_STEP && !self.wall_blocks(Vec3::X * intended_x.signum(), intended_x.abs(), query, world) {
            self.position.x += intended_x;
        }
        let intended_z = self.velocity.z * dt;
        if intended_z.abs() > MIN_AXIS_STEP && !self.wall_blocks(Vec3::Z * intended_z.signum(), intended_z.abs(), query, world) {
            self.position.z += intended_z;
        }

        let landed = self.resolve_vertical(dt, query, world);

        if self.position.y < self.config.kill_depth {
            self.velocity.y = 0.0;
            self.position = self.config.respawn_point;
            return PlayerTick {
                fell_out_of_world: true,
                landed,
            };
        }

        PlayerTick {
            fell_out_of_world: false,
            landed,
        }
    }

    fn wall_blocks<Q: SpatialQuery>(
        &self,
        direction: Vec3,
        distance: f32,
        query: &Q,
        world: &ColliderSet,
    ) -> bool {
        let origin = self.position - Vec3::Y * self.config.wall_probe_drop;
        query
            .nearest(origin, direction, self.config.wall_probe_range, world.iter())
            .is_some_and(|hit| hit.distance < self.config.radius + distance)
    }

    /// Ground snap or free vertical integration. Returns true on snap.
    fn resolve_vertical<Q: SpatialQuery>(&mut self, dt: f32, query: &Q, world: &ColliderSet) -> bool {
        let buffer = self.config.ground_probe_buffer;
        let target_height = self.target_height();
        let origin = self.position + Vec3::Y * buffer;
        let hit = query.nearest(origin, Vec3::NEG_Y, self.config.ground_probe_range, world.iter());

        match hit {
            Some(hit)
                if hit.distance - buffer < target_height + self.config.snap_tolerance
                    && self.velocity.y <= 0.0 =>
            {
                self.position.y = hit.point.y + target_height;
                self.velocity.y = 0.0;
                self.grounded = true;
                true
            }
            _ => {
                self.position.y += self.velocity.y * dt;
                self.grounded = false;
                false
            }
        }
    }
}
