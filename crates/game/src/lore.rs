//! Lore discovery tracking.

use std::collections::HashSet;

/// Number of lore pieces the percentage is measured against.
pub const TOTAL_LORE_PIECES: usize = 8;

#[derive(Debug, Default)]
pub struct LoreSystem {
    discovered: HashSet<String>,
}

impl LoreSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a piece discovered. Repeats are ignored.
    pub fn add_lore(&mut self, id: &str, title: &str, content: &str) {
        if self.has_lore(id) {
            return;
        }
        self.discovered.insert(id.to_string());
        log::info!(
            "Lore discovered: {} ({} chars) [{}/{}, {:.1}%]",
            title,
            content.len(),
            self.discovered_count(),
            TOTAL_LORE_PIECES,
            self.discovery_percentage()
        );
    }

    pub fn has_lore(&self, id: &str) -> bool {
        self.discovered.contains(id)
    }

    pub fn discovered_count(&self) -> usize {
        self.discovered.len()
    }

    /// Share of lore found, against the fixed total.
    pub fn discovery_percentage(&self) -> f32 {
        self.discovered.len() as f32 / TOTAL_LORE_PIECES as f32 * 100.0
    }
}
