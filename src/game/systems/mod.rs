//! Game Systems
//!
//! Per-frame drivers over the actor registry.

pub mod combat;
pub mod game_loop;
pub mod mob_ai;

pub use combat::{BulletOutcome, CombatSystem};
pub use game_loop::{FrameSnapshot, GameLoop};
pub use mob_ai::{Behavior, MobAiSystem, ShootRequest};
