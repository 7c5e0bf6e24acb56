//! Player physics tuning.
//!
//! Load-time constants; nothing reconfigures them during play.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use static_assertions::const_assert;

/// Gravity in m/s²
pub const GRAVITY: f32 = 20.0;
/// Walking speed in m/s
pub const WALK_SPEED: f32 = 8.0;
/// Crouched speed in m/s
pub const CROUCH_SPEED: f32 = 4.0;
/// Vertical velocity applied by a jump, in m/s
pub const JUMP_FORCE: f32 = 10.0;
/// Standing eye height above the floor
pub const PLAYER_HEIGHT: f32 = 1.6;
/// Crouched eye height above the floor
pub const CROUCH_HEIGHT: f32 = 0.8;
/// Horizontal clearance kept from walls
pub const PLAYER_RADIUS: f32 = 0.5;

const_assert!(CROUCH_HEIGHT < PLAYER_HEIGHT);
const_assert!(CROUCH_SPEED <= WALK_SPEED);

/// Movement and collision parameters for the first-person controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerPhysicsConfig {
    pub gravity: f32,
    pub walk_speed: f32,
    pub crouch_speed: f32,
    pub jump_force: f32,
    /// Standing eye height
    pub height: f32,
    /// Crouched eye height
    pub crouch_height: f32,
    pub radius: f32,
    /// How far above the eye the ground probe starts. Keeps the probe
    /// origin above the floor when the eye height drops on crouch.
    pub ground_probe_buffer: f32,
    /// Ground probe reach, measured from the buffered origin
    pub ground_probe_range: f32,
    /// Slack above the standing height within which the player snaps to ground
    pub snap_tolerance: f32,
    /// Wall probe reach
    pub wall_probe_range: f32,
    /// How far below the eye wall probes are cast
    pub wall_probe_drop: f32,
    /// Below this height the player is considered out of the world
    pub kill_depth: f32,
    /// Where an out-of-world player is put back
    pub respawn_point: Vec3,
    /// Damage for falling out of the world
    pub fall_damage: f32,
}

impl Default for PlayerPhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            walk_speed: WALK_SPEED,
            crouch_speed: CROUCH_SPEED,
            jump_force: JUMP_FORCE,
            height: PLAYER_HEIGHT,
            crouch_height: CROUCH_HEIGHT,
            radius: PLAYER_RADIUS,
            ground_probe_buffer: 2.0,
            ground_probe_range: 20.0,
            snap_tolerance: 0.5,
            wall_probe_range: 5.0,
            wall_probe_drop: 1.0,
            kill_depth: -50.0,
            respawn_point: Vec3::new(0.0, 10.0, 0.0),
            fall_damage: 20.0,
        }
    }
}
