//! Player stance.
//!
//! Crouch is held, not toggled, and the target eye height switches
//! instantly; the ground probe's buffered origin absorbs the change.

use super::config::PlayerPhysicsConfig;

/// Player stance states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stance {
    /// Standing upright at full height
    #[default]
    Standing,
    /// Crouched at reduced height and speed
    Crouching,
}

impl Stance {
    /// Stance for the current crouch flag.
    pub fn from_crouch(crouching: bool) -> Self {
        if crouching {
            Stance::Crouching
        } else {
            Stance::Standing
        }
    }

    /// Eye height above the floor for this stance.
    pub fn height(&self, config: &PlayerPhysicsConfig) -> f32 {
        match self {
            Stance::Standing => config.height,
            Stance::Crouching => config.crouch_height,
        }
    }

    /// Horizontal movement speed for this stance.
    pub fn speed(&self, config: &PlayerPhysicsConfig) -> f32 {
        match self {
            Stance::Standing => config.walk_speed,
            Stance::Crouching => config.crouch_speed,
        }
    }
}
