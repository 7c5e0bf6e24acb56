//! Bus Stop Engine Library
//!
//! Simulation core of a first-person shooter: ray-probed player movement,
//! mob patrol and pursuit AI, swept-ray bullet combat and cosmetic
//! particles. Rendering, asset decoding and raw input capture stay with
//! the host; this crate consumes movement flags and input events and
//! produces a frame snapshot plus game and UI events.
//!
//! # Modules
//!
//! - [`physics`] - Axis-aligned colliders and the ray query service
//! - [`input`] - Movement flags and discrete input events
//! - [`player`] - First-person controller and weapon rig
//! - [`game`] - Actors, routes, session state and the frame pipeline
//!
//! # Example
//!
//! ```ignore
//! use bus_stop_engine::game::{AssetCatalog, GameLoop, GameSettings};
//! use bus_stop_engine::input::{InputEvent, KeyCode, KeyboardState};
//!
//! let mut game = GameLoop::new(GameSettings::default(), None, AssetCatalog::default());
//! let mut keyboard = KeyboardState::new();
//!
//! game.handle_input(InputEvent::PointerLocked, now);
//! keyboard.handle_key(KeyCode::W, true);
//!
//! // Each host frame:
//! game.frame(now, &keyboard.movement);
//! let snapshot = game.snapshot();
//! for event in game.drain_ui() {
//!     // update overlays
//! }
//! ```

pub mod input;
pub mod physics;
pub mod player;

// Game-specific modules (located in src/game/ directory)
#[path = "../../src/game/mod.rs"]
pub mod game;

// Re-export commonly used input types
pub use input::{InputEvent, KeyCode, KeyboardState, MovementKeys};
// Re-export player types
pub use player::{PlayerController, PlayerPhysicsConfig, WeaponRig};
// Re-export the simulation entry point
pub use game::{GameLoop, GameSettings};
