//! First-person weapon rig.
//!
//! The rig hangs off the camera at a fixed local offset. Firing kicks it
//! back and up; it eases back to rest afterwards. Player bullets leave
//! from a muzzle point expressed in rig-local space.

use glam::{Mat4, Quat, Vec3};

/// Camera-local rest position of the rig
pub const REST_OFFSET: Vec3 = Vec3::new(0.4, -0.5, -0.5);
/// Camera-local position the rig kicks toward when firing
pub const RECOIL_OFFSET: Vec3 = Vec3::new(0.4, -0.4, -0.4);
/// Rig pitch at full recoil (radians)
pub const RECOIL_PITCH: f32 = 0.2;
/// Rig-local muzzle point
pub const MUZZLE_LOCAL: Vec3 = Vec3::new(0.0, 0.0, -1.0);

const KICK_RATE: f32 = 20.0;
const SETTLE_RATE: f32 = 10.0;
const KICK_DONE_DISTANCE: f32 = 0.01;

#[derive(Debug, Clone)]
pub struct WeaponRig {
    offset: Vec3,
    pitch: f32,
    recoiling: bool,
}

impl Default for WeaponRig {
    fn default() -> Self {
        Self {
            offset: REST_OFFSET,
            pitch: 0.0,
            recoiling: false,
        }
    }
}

impl WeaponRig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a recoil kick.
    pub fn kick(&mut self) {
        self.recoiling = true;
    }

    pub fn is_recoiling(&self) -> bool {
        self.recoiling
    }

    /// Current camera-local offset.
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Ease toward the recoil pose while kicking, toward rest otherwise.
    pub fn update(&mut self, delta: f32) {
        if self.recoiling {
            let t = (KICK_RATE * delta).clamp(0.0, 1.0);
            self.offset = self.offset.lerp(RECOIL_OFFSET, t);
            self.pitch += (RECOIL_PITCH - self.pitch) * t;
            if self.offset.distance(RECOIL_OFFSET) < KICK_DONE_DISTANCE {
                self.recoiling = false;
            }
        } else {
            let t = (SETTLE_RATE * delta).clamp(0.0, 1.0);
            self.offset = self.offset.lerp(REST_OFFSET, t);
            self.pitch += (0.0 - self.pitch) * t;
        }
    }

    /// Snap back to rest (level restart).
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Rig local-to-world transform given the camera's.
    pub fn world_matrix(&self, camera: Mat4) -> Mat4 {
        camera * Mat4::from_rotation_translation(Quat::from_rotation_x(self.pitch), self.offset)
    }

    /// World-space muzzle position.
    pub fn muzzle(&self, camera: Mat4) -> Vec3 {
        self.world_matrix(camera).transform_point3(MUZZLE_LOCAL)
    }
}
