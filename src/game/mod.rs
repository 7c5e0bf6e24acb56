//! Game Module
//!
//! The bus-stop shooter built on top of the engine: level data, actors,
//! session state and the per-frame systems.

pub mod actors;
pub mod animation;
pub mod config;
pub mod error;
pub mod events;
pub mod loading;
pub mod rng;
pub mod routes;
pub mod session;
pub mod spawn;
pub mod systems;
pub mod world;

pub use actors::{
    ActorId, ActorKind, ActorRegistry, ActorView, AggroState, Bullet, Mob, MobKind, MobState,
    Particle,
};
pub use animation::{AnimatedActor, ClipSet};
pub use config::{
    ActorPrototype, AssetCatalog, ClipDesc, CombatConfig, GameSettings, MobAiConfig, SpawnConfig,
};
pub use error::LoadError;
pub use events::{EventQueue, GameEvent, HealthDisplay, MAX_PENDING_EVENTS, UiEvent};
pub use loading::{LOAD_TIMEOUT, LoadGate, LoadOutcome};
pub use routes::{Route, RouteLine, RouteTable, route_name};
pub use session::GameSession;
pub use systems::{BulletOutcome, CombatSystem, FrameSnapshot, GameLoop, MobAiSystem, ShootRequest};
pub use world::{StaticWorld, WorldData, WorldObject};
