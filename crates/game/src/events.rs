//! Window and device event handling for GameState.

use winit::event::{DeviceEvent, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::crafting::CraftingSystem;
use crate::engine::SessionState;

/// Recipe slot for a number key while the inventory is open.
fn craft_slot(key: KeyCode) -> Option<usize> {
    match key {
        KeyCode::Digit1 => Some(0),
        KeyCode::Digit2 => Some(1),
        KeyCode::Digit3 => Some(2),
        KeyCode::Digit4 => Some(3),
        KeyCode::Digit5 => Some(4),
        _ => None,
    }
}

impl crate::GameState {
    /// Handle a window event. Returns true if the app should exit.
    pub(crate) fn handle_window_event(&mut self, event: WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => {
                self.running = false;
                true
            }
            WindowEvent::Resized(size) => {
                self.engine.resize(size.width, size.height);
                false
            }
            WindowEvent::Focused(false) => {
                self.release_cursor();
                false
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    self.input.process_keyboard(key, event.state);
                    if event.state.is_pressed() && !event.repeat {
                        self.handle_key_press(key);
                    }
                }
                false
            }
            WindowEvent::MouseInput { state, .. } => {
                if state.is_pressed()
                    && !self.input.is_cursor_locked()
                    && !self.engine.is_inventory_open()
                {
                    self.grab_cursor();
                }
                false
            }
            WindowEvent::RedrawRequested => {
                self.update();
                self.window.request_redraw();
                false
            }
            _ => false,
        }
    }

    fn handle_key_press(&mut self, key: KeyCode) {
        if key == KeyCode::Digit4 && self.input.is_modifier_held() {
            self.engine.toggle_manual_low_perf();
            return;
        }

        match key {
            KeyCode::Escape => self.release_cursor(),
            KeyCode::KeyE => {
                self.engine.toggle_inventory();
                if self.engine.is_inventory_open() {
                    self.release_cursor();
                }
            }
            KeyCode::Enter | KeyCode::NumpadEnter | KeyCode::Space => self.engine.resume(),
            KeyCode::KeyR if self.engine.state() == SessionState::Dead => self.restart(),
            _ => {
                if !self.engine.is_inventory_open() {
                    return;
                }
                let recipe_id = craft_slot(key)
                    .and_then(|slot| CraftingSystem::new().recipes().nth(slot))
                    .map(|(id, _)| id);
                if let Some(id) = recipe_id {
                    self.engine.craft(id);
                }
            }
        }
    }

    /// Handle device events (raw mouse motion).
    pub(crate) fn handle_device_event(&mut self, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.input.is_cursor_locked() {
                self.input.process_mouse_motion(delta);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_keys_map_to_recipe_slots() {
        assert_eq!(craft_slot(KeyCode::Digit1), Some(0));
        assert_eq!(craft_slot(KeyCode::Digit5), Some(4));
        assert_eq!(craft_slot(KeyCode::Digit6), None);
        let id = craft_slot(KeyCode::Digit2)
            .and_then(|slot| CraftingSystem::new().recipes().nth(slot))
            .map(|(id, _)| id);
        assert_eq!(id, Some("speed_boost"));
    }
}
