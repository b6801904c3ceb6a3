//! Per-frame keyboard and mouse input resource.
//!
//! Captures the keys the demos care about and exposes them to systems via the
//! [`InputState`] resource. Key state is stored in a fixed array indexed by
//! [`Key`], so every lookup is in bounds by construction.
use bevy_ecs::prelude::*;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Keys tracked by the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Space,
    Enter,
    Escape,
    P,
    R,
    W,
    A,
    S,
    D,
    F10,
    F11,
    F12,
}

impl Key {
    /// Number of tracked keys.
    pub const COUNT: usize = 16;

    /// Every tracked key, in index order.
    pub const ALL: [Key; Key::COUNT] = [
        Key::Up,
        Key::Down,
        Key::Left,
        Key::Right,
        Key::Space,
        Key::Enter,
        Key::Escape,
        Key::P,
        Key::R,
        Key::W,
        Key::A,
        Key::S,
        Key::D,
        Key::F10,
        Key::F11,
        Key::F12,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Lowercase name used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            Key::Up => "up",
            Key::Down => "down",
            Key::Left => "left",
            Key::Right => "right",
            Key::Space => "space",
            Key::Enter => "enter",
            Key::Escape => "escape",
            Key::P => "p",
            Key::R => "r",
            Key::W => "w",
            Key::A => "a",
            Key::S => "s",
            Key::D => "d",
            Key::F10 => "f10",
            Key::F11 => "f11",
            Key::F12 => "f12",
        }
    }

    /// Parse a key name, case-insensitively. `esc` and `return` are accepted
    /// as aliases.
    pub fn from_name(name: &str) -> Option<Key> {
        let lower = name.trim().to_ascii_lowercase();
        match lower.as_str() {
            "esc" => return Some(Key::Escape),
            "return" => return Some(Key::Enter),
            _ => {}
        }
        Key::ALL.into_iter().find(|k| k.name() == lower)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Boolean key state for one frame.
pub struct BoolState {
    /// Whether the key is held this frame.
    pub active: bool,
    /// Whether the key went down this frame.
    pub just_pressed: bool,
    /// Whether the key went up this frame.
    pub just_released: bool,
}

impl BoolState {
    /// Advance to the next frame given whether the key is now held.
    fn advance(&mut self, down: bool) {
        self.just_pressed = down && !self.active;
        self.just_released = !down && self.active;
        self.active = down;
    }
}

/// Resource capturing the per-frame input state.
///
/// Written once per frame by
/// [`update_input_state`](crate::systems::input::update_input_state) before
/// the game's update runs; read-only for the rest of the frame.
#[derive(Resource, Debug, Clone, Default)]
pub struct InputState {
    keys: [BoolState; Key::COUNT],
    mouse: Vec2,
}

impl InputState {
    /// Full state of `key`.
    pub fn key(&self, key: Key) -> &BoolState {
        &self.keys[key.index()]
    }

    /// Whether `key` is held this frame.
    pub fn is_down(&self, key: Key) -> bool {
        self.key(key).active
    }

    /// Whether `key` went down this frame.
    pub fn is_pressed(&self, key: Key) -> bool {
        self.key(key).just_pressed
    }

    /// Whether `key` went up this frame.
    pub fn is_released(&self, key: Key) -> bool {
        self.key(key).just_released
    }

    /// Mouse position in screen coordinates as of this frame's poll.
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse
    }

    /// Record the polled state of `key`, deriving press/release edges from
    /// the previous frame.
    pub fn apply_key(&mut self, key: Key, down: bool) {
        self.keys[key.index()].advance(down);
    }

    /// Record the polled mouse position.
    pub fn set_mouse_position(&mut self, pos: Vec2) {
        self.mouse = pos;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolstate_default() {
        let bs = BoolState::default();
        assert!(!bs.active);
        assert!(!bs.just_pressed);
        assert!(!bs.just_released);
    }

    #[test]
    fn test_inputstate_default_all_inactive() {
        let input = InputState::default();
        for key in Key::ALL {
            assert!(!input.is_down(key), "{key:?} should start released");
            assert!(!input.is_pressed(key));
            assert!(!input.is_released(key));
        }
        assert_eq!(input.mouse_position(), Vec2::ZERO);
    }

    #[test]
    fn test_press_hold_release_edges() {
        let mut input = InputState::default();

        input.apply_key(Key::Space, true);
        assert!(input.is_down(Key::Space));
        assert!(input.is_pressed(Key::Space));

        input.apply_key(Key::Space, true);
        assert!(input.is_down(Key::Space));
        assert!(!input.is_pressed(Key::Space));

        input.apply_key(Key::Space, false);
        assert!(!input.is_down(Key::Space));
        assert!(input.is_released(Key::Space));

        input.apply_key(Key::Space, false);
        assert!(!input.is_released(Key::Space));
    }

    #[test]
    fn test_keys_are_independent() {
        let mut input = InputState::default();
        input.apply_key(Key::Left, true);
        assert!(input.is_down(Key::Left));
        assert!(!input.is_down(Key::Right));
    }

    #[test]
    fn test_key_indices_match_all_order() {
        for (i, key) in Key::ALL.iter().enumerate() {
            assert_eq!(key.index(), i);
        }
    }

    #[test]
    fn test_key_from_name() {
        assert_eq!(Key::from_name("Escape"), Some(Key::Escape));
        assert_eq!(Key::from_name("esc"), Some(Key::Escape));
        assert_eq!(Key::from_name(" F11 "), Some(Key::F11));
        assert_eq!(Key::from_name("return"), Some(Key::Enter));
        assert_eq!(Key::from_name("tab"), None);
        for key in Key::ALL {
            assert_eq!(Key::from_name(key.name()), Some(key));
        }
    }
}
