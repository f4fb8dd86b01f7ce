//! Keyboard state handed to the input system each tick.
//!
//! The host's event loop owns an [`InputState`], updates it from key events,
//! and passes it by reference into [`Scheduler::tick`](crate::Scheduler::tick).
//! Keys start released.

use std::collections::HashSet;

/// The movement keys the input system understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Forward,
    Backward,
    Left,
    Right,
}

impl Key {
    /// Map a browser-style key code (`"KeyW"`, `"KeyA"`, ...) to a key.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "KeyW" => Some(Self::Forward),
            "KeyS" => Some(Self::Backward),
            "KeyA" => Some(Self::Left),
            "KeyD" => Some(Self::Right),
            _ => None,
        }
    }
}

/// Pressed/released state for every [`Key`].
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pressed: HashSet<Key>,
}

impl InputState {
    /// All keys released.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        self.pressed.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.pressed.remove(&key);
    }

    #[must_use]
    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    /// Release every key (e.g. when the window loses focus).
    pub fn clear(&mut self) {
        self.pressed.clear();
    }

    /// Apply a key-down event by code. Unknown codes are ignored.
    pub fn key_down(&mut self, code: &str) {
        if let Some(key) = Key::from_code(code) {
            self.press(key);
        }
    }

    /// Apply a key-up event by code. Unknown codes are ignored.
    pub fn key_up(&mut self, code: &str) {
        if let Some(key) = Key::from_code(code) {
            self.release(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_start_released() {
        let input = InputState::new();
        for key in [Key::Forward, Key::Backward, Key::Left, Key::Right] {
            assert!(!input.is_pressed(key));
        }
    }

    #[test]
    fn test_press_release_by_code() {
        let mut input = InputState::new();
        input.key_down("KeyW");
        input.key_down("Space");
        assert!(input.is_pressed(Key::Forward));
        input.key_up("KeyW");
        assert!(!input.is_pressed(Key::Forward));
    }

    #[test]
    fn test_clear() {
        let mut input = InputState::new();
        input.press(Key::Left);
        input.press(Key::Right);
        input.clear();
        assert!(!input.is_pressed(Key::Left));
        assert!(!input.is_pressed(Key::Right));
    }
}
