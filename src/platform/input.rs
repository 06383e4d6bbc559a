//! Keyboard state
//!
//! The frontend records raw key names as they go up and down; the tick only
//! ever sees the [`TickInput`] derived from them.

use std::collections::HashSet;

use crate::sim::{ShipControls, TickInput};

const TURN_LEFT_KEYS: [&str; 2] = ["arrowleft", "a"];
const TURN_RIGHT_KEYS: [&str; 2] = ["arrowright", "d"];
const THRUST_KEYS: [&str; 2] = ["arrowup", "w"];

/// Keys currently held, by lowercase name
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    held: HashSet<String>,
    /// One-shot requests consumed by the next tick
    fire_requested: bool,
    pause_requested: bool,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: &str) {
        self.held.insert(key.to_lowercase());
    }

    pub fn key_up(&mut self, key: &str) {
        self.held.remove(&key.to_lowercase());
    }

    fn any_down(&self, keys: &[&str]) -> bool {
        keys.iter().any(|k| self.held.contains(*k))
    }

    pub fn request_fire(&mut self) {
        self.fire_requested = true;
    }

    pub fn request_pause(&mut self) {
        self.pause_requested = true;
    }

    /// Forget everything (restart, focus loss)
    pub fn clear(&mut self) {
        self.held.clear();
        self.fire_requested = false;
        self.pause_requested = false;
    }

    pub fn controls(&self) -> ShipControls {
        ShipControls {
            turn_left: self.any_down(&TURN_LEFT_KEYS),
            turn_right: self.any_down(&TURN_RIGHT_KEYS),
            thrust: self.any_down(&THRUST_KEYS),
        }
    }

    /// Build this frame's input and consume one-shot requests
    pub fn take_tick_input(&mut self) -> TickInput {
        let input = TickInput {
            controls: self.controls(),
            fire: self.fire_requested,
            pause: self.pause_requested,
        };
        self.fire_requested = false;
        self.pause_requested = false;
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_and_wasd_map_to_controls() {
        let mut keys = KeyState::new();
        keys.key_down("ArrowLeft");
        keys.key_down("W");
        let c = keys.controls();
        assert!(c.turn_left && c.thrust && !c.turn_right);

        keys.key_up("arrowleft");
        keys.key_down("d");
        let c = keys.controls();
        assert!(!c.turn_left && c.turn_right);
    }

    #[test]
    fn test_one_shot_requests_are_consumed() {
        let mut keys = KeyState::new();
        keys.request_fire();
        keys.request_pause();
        let input = keys.take_tick_input();
        assert!(input.fire && input.pause);
        let input = keys.take_tick_input();
        assert!(!input.fire && !input.pause);
    }

    #[test]
    fn test_clear() {
        let mut keys = KeyState::new();
        keys.key_down("w");
        keys.request_fire();
        keys.clear();
        let input = keys.take_tick_input();
        assert!(!input.controls.thrust);
        assert!(!input.fire);
    }
}
