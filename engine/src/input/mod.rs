//! Input Module
//!
//! Platform-agnostic input: held movement flags and discrete action
//! events. Raw event capture stays with the host; it feeds key codes into
//! [`KeyboardState`] and pointer events straight in as [`InputEvent`]s.
//!
//! # Example
//!
//! ```rust,ignore
//! use bus_stop_engine::input::{InputEvent, KeyboardState, KeyCode};
//!
//! let mut keyboard = KeyboardState::new();
//! keyboard.handle_key(KeyCode::W, true);
//! if let Some(action) = keyboard.handle_key(KeyCode::Space, true) {
//!     game.handle_input(action, now);
//! }
//! ```

pub mod keyboard;

pub use keyboard::{KeyCode, KeyboardState, MovementKeys};

/// A discrete input action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer captured: the simulation may run
    PointerLocked,
    /// Pointer released: the simulation pauses
    PointerUnlocked,
    /// Primary button pressed
    Fire,
    /// Jump key pressed
    Jump,
    /// Route debug overlay toggle
    ToggleDebug,
    /// Mouse-look delta in radians (yaw right-positive, pitch up-positive)
    Look { yaw: f32, pitch: f32 },
}
