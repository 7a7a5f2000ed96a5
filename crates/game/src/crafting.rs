//! Crafting recipes and the material inventory they consume.

use std::collections::HashMap;

/// Item id to count. Counts never go negative.
pub type Inventory = HashMap<String, u32>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub name: &'static str,
    pub description: &'static str,
    pub required_items: &'static [(&'static str, u32)],
    pub effect: &'static str,
}

static RECIPES: [(&str, Recipe); 5] = [
    (
        "barrier",
        Recipe {
            name: "Protective Barrier",
            description: "Creates a temporary force field that pushes away deformed creatures",
            required_items: &[("scrap_metal", 3), ("wire", 2), ("battery", 1)],
            effect: "Grants 5 seconds of protection",
        },
    ),
    (
        "speed_boost",
        Recipe {
            name: "Speed Boost",
            description: "Accelerates your movement temporarily",
            required_items: &[("motor_oil", 2), ("spring", 3), ("battery", 1)],
            effect: "Double movement speed for 8 seconds",
        },
    ),
    (
        "emp_device",
        Recipe {
            name: "EMP Device",
            description: "Temporarily disables nearby deformed creatures",
            required_items: &[("circuit_board", 2), ("wire", 4), ("battery", 2)],
            effect: "Stun all creatures within 20m for 3 seconds",
        },
    ),
    (
        "healing_kit",
        Recipe {
            name: "Medical Kit",
            description: "Restores some of your health",
            required_items: &[("bandage", 3), ("medicine", 1), ("water_bottle", 1)],
            effect: "Restore 50 health",
        },
    ),
    (
        "invisibility_cloak",
        Recipe {
            name: "Invisibility Cloak",
            description: "Makes you invisible to creatures briefly",
            required_items: &[("cloth", 4), ("mirror_shard", 2), ("battery", 2)],
            effect: "Become invisible for 6 seconds",
        },
    ),
];

/// Recipe lookup and all-or-nothing crafting.
#[derive(Debug, Default, Clone, Copy)]
pub struct CraftingSystem;

impl CraftingSystem {
    pub fn new() -> Self {
        Self
    }

    pub fn recipe(&self, item_id: &str) -> Option<&'static Recipe> {
        RECIPES.iter().find(|(id, _)| *id == item_id).map(|(_, r)| r)
    }

    /// All recipes with their item ids.
    pub fn recipes(&self) -> impl Iterator<Item = (&'static str, &'static Recipe)> {
        RECIPES.iter().map(|(id, r)| (*id, r))
    }

    /// True when `item_id` has a recipe and every ingredient is on hand.
    pub fn can_craft(&self, item_id: &str, inventory: &Inventory) -> bool {
        self.recipe(item_id).is_some_and(|recipe| {
            recipe
                .required_items
                .iter()
                .all(|(item, amount)| inventory.get(*item).copied().unwrap_or(0) >= *amount)
        })
    }

    /// Consume the ingredients for `item_id`. Leaves the inventory untouched
    /// unless every ingredient is available.
    pub fn craft(&self, item_id: &str, inventory: &mut Inventory) -> Option<&'static Recipe> {
        if !self.can_craft(item_id, inventory) {
            return None;
        }
        let recipe = self.recipe(item_id)?;
        for (item, amount) in recipe.required_items {
            if let Some(count) = inventory.get_mut(*item) {
                *count -= amount;
            }
        }
        Some(recipe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inventory(items: &[(&str, u32)]) -> Inventory {
        items.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn short_ingredient_blocks_craft_without_deduction() {
        let crafting = CraftingSystem::new();
        let mut inv = inventory(&[("motor_oil", 1), ("spring", 5), ("battery", 5)]);
        let before = inv.clone();
        assert!(!crafting.can_craft("speed_boost", &inv));
        assert!(crafting.craft("speed_boost", &mut inv).is_none());
        assert_eq!(inv, before);
    }

    #[test]
    fn exact_ingredients_craft_and_zero_out() {
        let crafting = CraftingSystem::new();
        let mut inv = inventory(&[("motor_oil", 2), ("spring", 3), ("battery", 1)]);
        let recipe = crafting.craft("speed_boost", &mut inv);
        assert_eq!(recipe.map(|r| r.name), Some("Speed Boost"));
        assert_eq!(inv, inventory(&[("motor_oil", 0), ("spring", 0), ("battery", 0)]));
    }

    #[test]
    fn unknown_recipe_never_crafts() {
        let crafting = CraftingSystem::new();
        let mut inv = inventory(&[("battery", 99)]);
        assert!(!crafting.can_craft("jetpack", &inv));
        assert!(crafting.craft("jetpack", &mut inv).is_none());
        assert!(crafting.recipe("jetpack").is_none());
    }

    #[test]
    fn missing_ingredient_counts_as_zero() {
        let crafting = CraftingSystem::new();
        let inv = inventory(&[("bandage", 3), ("medicine", 1)]);
        assert!(!crafting.can_craft("healing_kit", &inv));
    }

    #[test]
    fn recipe_table_is_complete() {
        let crafting = CraftingSystem::new();
        let ids: Vec<_> = crafting.recipes().map(|(id, _)| id).collect();
        assert_eq!(
            ids,
            ["barrier", "speed_boost", "emp_device", "healing_kit", "invisibility_cloak"]
        );
        assert_eq!(crafting.recipe("healing_kit").map(|r| r.name), Some("Medical Kit"));
    }
}
