//! Config Module
//!
//! Load-time configuration: gameplay tuning and the asset catalog.

pub mod catalog;
pub mod settings;

pub use catalog::{ActorPrototype, AssetCatalog, ClipDesc};
pub use settings::{CombatConfig, GameSettings, MobAiConfig, SpawnConfig};
