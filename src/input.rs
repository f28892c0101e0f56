use std::collections::HashSet;

use glam::Vec2;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Identifier for a physical keyboard key the demo reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    Character(char),
    Escape,
}

impl KeyCode {
    /// Letter keys are stored uppercase regardless of how they arrive.
    pub fn character(ch: char) -> Self {
        Self::Character(ch.to_ascii_uppercase())
    }
}

/// Input snapshot shared between the window event loop and the frame updater.
///
/// The event loop writes key transitions and cursor positions as they arrive;
/// the frame updater reads the snapshot once per frame.
#[derive(Debug, Default)]
pub struct InputState {
    keys: RwLock<HashSet<KeyCode>>,
    mouse_position: RwLock<Vec2>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key_down(&self, key: KeyCode) {
        self.keys.write().insert(key);
    }

    pub fn set_key_up(&self, key: KeyCode) {
        self.keys.write().remove(&key);
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys.read().contains(&key)
    }

    pub fn set_mouse_position(&self, position: Vec2) {
        *self.mouse_position.write() = position;
    }

    pub fn mouse_position(&self) -> Vec2 {
        *self.mouse_position.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_key_transitions() {
        let state = InputState::new();
        state.set_key_down(KeyCode::character('w'));
        assert!(state.is_key_down(KeyCode::Character('W')));
        state.set_key_up(KeyCode::Character('W'));
        assert!(!state.is_key_down(KeyCode::Character('W')));
    }

    #[test]
    fn character_keys_normalize_case() {
        assert_eq!(KeyCode::character('l'), KeyCode::Character('L'));
        assert_eq!(KeyCode::character('L'), KeyCode::Character('L'));
    }

    #[test]
    fn remembers_last_cursor_position() {
        let state = InputState::new();
        assert_eq!(state.mouse_position(), Vec2::ZERO);
        state.set_mouse_position(Vec2::new(320.0, 240.0));
        assert_eq!(state.mouse_position(), Vec2::new(320.0, 240.0));
    }
}
