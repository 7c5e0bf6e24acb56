//! Player Module
//!
//! First-person player body and weapon.
//!
//! # Components
//!
//! - [`PlayerController`] - Ray-probed movement: wall probes per axis, buffered ground probe,
//!   gravity, jump, crouch, and the out-of-world safety net
//! - [`Stance`] - Standing / crouching heights and speeds
//! - [`WeaponRig`] - Camera-attached weapon offset, recoil, and muzzle transform
//! - [`PlayerPhysicsConfig`] - Tuning constants

pub mod config;
pub mod controller;
pub mod stance;
pub mod weapon_rig;

pub use config::{
    PlayerPhysicsConfig, CROUCH_HEIGHT, CROUCH_SPEED, GRAVITY, JUMP_FORCE, PLAYER_HEIGHT,
    PLAYER_RADIUS, WALK_SPEED,
};
pub use controller::{PlayerController, PlayerTick};
pub use stance::Stance;
pub use weapon_rig::WeaponRig;
