//! Keyboard and mouse sampling for the simulation loop.
//!
//! Window events feed an [`InputSampler`]; once per simulation tick the loop
//! takes a [`InputSnapshot`] and immediately calls [`InputSampler::reset`] so
//! mouse motion is never counted twice.

use glam::Vec2;
use std::collections::HashSet;

/// Accumulates raw input between simulation ticks.
#[derive(Debug, Default)]
pub struct InputSampler {
    /// Keys currently held down. Persists until key-up.
    keys_held: HashSet<KeyCode>,
    /// Relative mouse motion since the last reset.
    accumulated_delta: Vec2,
    /// Whether the cursor is captured. Mouse motion only counts while captured.
    cursor_locked: bool,
}

/// Read-only view of the input state at one tick.
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    pub keys: HashSet<KeyCode>,
    pub mouse_delta: Vec2,
}

impl InputSnapshot {
    /// Check if a key is held in this snapshot.
    pub fn is_held(&self, key: KeyCode) -> bool {
        self.keys.contains(&key)
    }

    /// Planar move intent in camera space: x is strafe (A = -1, D = +1),
    /// y is depth (W = -1, S = +1). Not normalized.
    pub fn movement_axes(&self) -> Vec2 {
        let mut movement = Vec2::ZERO;

        if self.is_held(KeyCode::KeyW) {
            movement.y -= 1.0;
        }
        if self.is_held(KeyCode::KeyS) {
            movement.y += 1.0;
        }
        if self.is_held(KeyCode::KeyA) {
            movement.x -= 1.0;
        }
        if self.is_held(KeyCode::KeyD) {
            movement.x += 1.0;
        }

        movement
    }
}

impl InputSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a keyboard event.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
            }
        }
    }

    /// Process relative mouse motion. Ignored while the cursor is not captured.
    pub fn process_mouse_motion(&mut self, delta: (f64, f64)) {
        if !self.cursor_locked {
            return;
        }
        self.accumulated_delta.x += delta.0 as f32;
        self.accumulated_delta.y += delta.1 as f32;
    }

    /// Current held keys and accumulated mouse delta.
    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            keys: self.keys_held.clone(),
            mouse_delta: self.accumulated_delta,
        }
    }

    /// Zero the accumulated mouse delta. Held keys persist until key-up.
    pub fn reset(&mut self) {
        self.accumulated_delta = Vec2::ZERO;
    }

    /// Check if a key is currently held.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Either control key (or the platform command key) is held.
    pub fn is_modifier_held(&self) -> bool {
        self.is_key_held(KeyCode::ControlLeft)
            || self.is_key_held(KeyCode::ControlRight)
            || self.is_key_held(KeyCode::SuperLeft)
            || self.is_key_held(KeyCode::SuperRight)
    }

    /// Check if the cursor is locked.
    pub fn is_cursor_locked(&self) -> bool {
        self.cursor_locked
    }

    /// Set cursor lock state. Releasing the cursor drops any pending motion.
    pub fn set_cursor_locked(&mut self, locked: bool) {
        if self.cursor_locked != locked {
            log::debug!("Cursor capture {}", if locked { "acquired" } else { "released" });
        }
        self.cursor_locked = locked;
        if !locked {
            self.accumulated_delta = Vec2::ZERO;
        }
    }
}

// Re-export for convenience
pub use winit::event::ElementState;
pub use winit::keyboard::KeyCode;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_delta_accumulates_until_reset() {
        let mut input = InputSampler::new();
        input.set_cursor_locked(true);
        input.process_mouse_motion((3.0, -1.0));
        input.process_mouse_motion((2.0, 4.0));
        assert_eq!(input.snapshot().mouse_delta, Vec2::new(5.0, 3.0));

        input.reset();
        assert_eq!(input.snapshot().mouse_delta, Vec2::ZERO);
    }

    #[test]
    fn held_keys_survive_reset() {
        let mut input = InputSampler::new();
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        input.reset();
        assert!(input.snapshot().is_held(KeyCode::KeyW));

        input.process_keyboard(KeyCode::KeyW, ElementState::Released);
        assert!(!input.snapshot().is_held(KeyCode::KeyW));
    }

    #[test]
    fn motion_ignored_without_capture() {
        let mut input = InputSampler::new();
        input.process_mouse_motion((10.0, 10.0));
        assert_eq!(input.snapshot().mouse_delta, Vec2::ZERO);
    }

    #[test]
    fn control_counts_as_modifier() {
        let mut input = InputSampler::new();
        assert!(!input.is_modifier_held());
        input.process_keyboard(KeyCode::ControlLeft, ElementState::Pressed);
        assert!(input.is_modifier_held());
        input.process_keyboard(KeyCode::ControlLeft, ElementState::Released);
        assert!(!input.is_modifier_held());
    }

    #[test]
    fn releasing_capture_drops_pending_motion() {
        let mut input = InputSampler::new();
        input.set_cursor_locked(true);
        input.process_mouse_motion((4.0, 4.0));
        input.set_cursor_locked(false);
        assert_eq!(input.snapshot().mouse_delta, Vec2::ZERO);
    }

    #[test]
    fn movement_axes_follow_wasd() {
        let mut input = InputSampler::new();
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        input.process_keyboard(KeyCode::KeyD, ElementState::Pressed);
        assert_eq!(input.snapshot().movement_axes(), Vec2::new(1.0, -1.0));
    }
}
