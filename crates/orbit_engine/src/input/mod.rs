//! Input abstraction
//!
//! The engine never polls a window; it reads input through the narrow
//! [`InputSource`] trait. The windowed implementation lives with the
//! embedding application, while [`ScriptedInput`] drives headless runs and
//! tests deterministically.

use crate::foundation::math::Vec2;
use std::collections::HashSet;

/// Key codes the gameplay systems care about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A key
    A,
    /// D key
    D,
    /// E key
    E,
    /// Q key
    Q,
    /// S key
    S,
    /// W key
    W,
    /// Left shift key
    LeftShift,
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Middle mouse button
    Middle,
    /// Right mouse button
    Right,
}

/// Read-only input state plus pointer capture control
pub trait InputSource {
    /// Whether the key is currently held
    fn is_key_pressed(&self, key: KeyCode) -> bool;

    /// Whether the key was released since the previous frame
    fn was_key_released(&self, key: KeyCode) -> bool;

    /// Whether the mouse button is currently held
    fn is_mouse_pressed(&self, button: MouseButton) -> bool;

    /// Pointer movement since the previous frame, in pixels
    fn pointer_delta(&self) -> Vec2;

    /// Scroll wheel movement since the previous frame
    fn scroll_delta(&self) -> Vec2;

    /// Hide the pointer and lock it to the window
    fn capture_pointer(&mut self);

    /// Release and unhide the pointer
    fn release_pointer(&mut self);
}

/// Deterministic input source for tests and headless runs
///
/// State is set explicitly between frames; nothing decays on its own
/// except the just-released set, which the driver clears via
/// [`ScriptedInput::next_frame`].
#[derive(Debug)]
pub struct ScriptedInput {
    pressed_keys: HashSet<KeyCode>,
    released_keys: HashSet<KeyCode>,
    pressed_buttons: HashSet<MouseButton>,
    pointer_delta: Vec2,
    scroll_delta: Vec2,
    /// Whether the pointer is currently captured
    pub pointer_captured: bool,
}

impl Default for ScriptedInput {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedInput {
    /// Create an input source with nothing pressed
    pub fn new() -> Self {
        Self {
            pressed_keys: HashSet::new(),
            released_keys: HashSet::new(),
            pressed_buttons: HashSet::new(),
            pointer_delta: Vec2::zeros(),
            scroll_delta: Vec2::zeros(),
            pointer_captured: false,
        }
    }

    /// Press a key
    pub fn press_key(&mut self, key: KeyCode) {
        self.pressed_keys.insert(key);
    }

    /// Release a key, recording it as just-released for the next frame
    pub fn release_key(&mut self, key: KeyCode) {
        if self.pressed_keys.remove(&key) {
            self.released_keys.insert(key);
        }
    }

    /// Press a mouse button
    pub fn press_button(&mut self, button: MouseButton) {
        self.pressed_buttons.insert(button);
    }

    /// Release a mouse button
    pub fn release_button(&mut self, button: MouseButton) {
        self.pressed_buttons.remove(&button);
    }

    /// Set the pointer delta reported for the current frame
    pub fn set_pointer_delta(&mut self, delta: Vec2) {
        self.pointer_delta = delta;
    }

    /// Set the scroll delta reported for the current frame
    pub fn set_scroll_delta(&mut self, delta: Vec2) {
        self.scroll_delta = delta;
    }

    /// Reset the per-frame state (deltas and the just-released set)
    pub fn next_frame(&mut self) {
        self.released_keys.clear();
        self.pointer_delta = Vec2::zeros();
        self.scroll_delta = Vec2::zeros();
    }
}

impl InputSource for ScriptedInput {
    fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.pressed_keys.contains(&key)
    }

    fn was_key_released(&self, key: KeyCode) -> bool {
        self.released_keys.contains(&key)
    }

    fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    fn pointer_delta(&self) -> Vec2 {
        self.pointer_delta
    }

    fn scroll_delta(&self) -> Vec2 {
        self.scroll_delta
    }

    fn capture_pointer(&mut self) {
        self.pointer_captured = true;
    }

    fn release_pointer(&mut self) {
        self.pointer_captured = false;
    }
}
