//! HUD seam: what the simulation tells the player.

use std::fmt::Write as _;

use engine_core::Vec3;

use crate::crafting::Inventory;

/// Receives HUD updates from the engine. Every call is best-effort.
pub trait UiSurface {
    fn update_position(&mut self, position: Vec3);
    fn update_health(&mut self, health: i32);
    fn update_collected(&mut self, count: usize);
    /// Open the lore panel.
    fn show_lore(&mut self, title: &str, content: &str);
    fn hide_lore(&mut self);
    fn show_death(&mut self, reason: &str);
    fn set_warning_visible(&mut self, visible: bool);
    fn set_inventory(&mut self, open: bool, inventory: &Inventory);
}

/// HUD state kept in memory and rendered as one status line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HudState {
    pub position: Vec3,
    pub health: i32,
    pub collected: usize,
    /// Title and body of the open lore panel.
    pub lore: Option<(String, String)>,
    pub death: Option<String>,
    pub warning: bool,
    pub inventory_open: bool,
    pub inventory: Vec<(String, u32)>,
}

impl HudState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status line for the window title.
    pub fn title_line(&self) -> String {
        if let Some(reason) = &self.death {
            return format!("Deformed | DEAD: {} | press R to restart", reason);
        }
        if let Some((title, _)) = &self.lore {
            return format!("Deformed | {} | press Enter to continue", title);
        }

        let mut line = format!(
            "Deformed | HP {} | Collected {} | ({:.1}, {:.1}, {:.1})",
            self.health, self.collected, self.position.x, self.position.y, self.position.z
        );
        if self.inventory_open {
            line.push_str(" | Inventory:");
            if self.inventory.is_empty() {
                line.push_str(" empty");
            }
            for (item, count) in &self.inventory {
                let _ = write!(line, " {} x{}", item, count);
            }
        }
        if self.warning {
            line.push_str(" | SOMETHING IS NEAR");
        }
        line
    }
}

impl UiSurface for HudState {
    fn update_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn update_health(&mut self, health: i32) {
        self.health = health;
    }

    fn update_collected(&mut self, count: usize) {
        self.collected = count;
    }

    fn show_lore(&mut self, title: &str, content: &str) {
        log::info!("{}\n\n{}", title, content);
        self.lore = Some((title.to_string(), content.to_string()));
    }

    fn hide_lore(&mut self) {
        self.lore = None;
    }

    fn show_death(&mut self, reason: &str) {
        log::info!("{}", reason);
        self.death = Some(reason.to_string());
    }

    fn set_warning_visible(&mut self, visible: bool) {
        self.warning = visible;
    }

    fn set_inventory(&mut self, open: bool, inventory: &Inventory) {
        self.inventory_open = open;
        let mut items: Vec<_> = inventory
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(item, count)| (item.clone(), *count))
            .collect();
        items.sort();
        self.inventory = items;
    }
}
