//! Keyboard Input Module
//!
//! Held movement flags plus the discrete actions some keys trigger.
//! Decoupled from any windowing system: hosts translate their own key
//! events into [`KeyCode`].

use super::InputEvent;

/// Generic key codes, independent of windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    W,
    A,
    S,
    D,
    Space,
    Tab,
    P,
    Escape,
    /// Catch-all for unhandled keys
    Unknown,
}

/// Tracks which movement keys are currently held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementKeys {
    /// W key - move forward
    pub forward: bool,
    /// S key - move backward
    pub backward: bool,
    /// A key - strafe left
    pub left: bool,
    /// D key - strafe right
    pub right: bool,
    /// Tab - crouch while held
    pub crouch: bool,
}

impl MovementKeys {
    /// Create a new movement keys state with all keys released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update movement state based on key press/release.
    ///
    /// Returns `true` if the key was a movement key and was handled.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        let slot = match key {
            KeyCode::W => &mut self.forward,
            KeyCode::S => &mut self.backward,
            KeyCode::A => &mut self.left,
            KeyCode::D => &mut self.right,
            KeyCode::Tab => &mut self.crouch,
            _ => return false,
        };
        *slot = pressed;
        true
    }

    /// Check if any directional key is currently held.
    pub fn any_pressed(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    /// Reset all movement keys to released state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Forward/backward direction (-1, 0, or 1).
    pub fn forward_axis(&self) -> i32 {
        (self.forward as i32) - (self.backward as i32)
    }

    /// Left/right direction (-1, 0, or 1).
    pub fn right_axis(&self) -> i32 {
        (self.right as i32) - (self.left as i32)
    }
}

/// Complete keyboard state: held movement keys plus edge detection for
/// action keys.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    /// Movement key states
    pub movement: MovementKeys,
    jump_held: bool,
    debug_held: bool,
}

impl KeyboardState {
    /// Create a new keyboard state with all keys released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a key press or release.
    ///
    /// Returns the discrete action fired by this event, if any. Actions
    /// fire on the press edge only; OS key repeat is ignored.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> Option<InputEvent> {
        if self.movement.handle_key(key, pressed) {
            return None;
        }
        match key {
            KeyCode::Space => Self::edge(&mut self.jump_held, pressed, InputEvent::Jump),
            KeyCode::P => Self::edge(&mut self.debug_held, pressed, InputEvent::ToggleDebug),
            _ => None,
        }
    }

    fn edge(held: &mut bool, pressed: bool, event: InputEvent) -> Option<InputEvent> {
        let fired = pressed && !*held;
        *held = pressed;
        fired.then_some(event)
    }

    /// Reset all keyboard state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
