//! Player progression: experience, level and granted items.
//!
//! Experience accumulates towards a fixed per-level threshold. Crossing the
//! threshold raises the level by one and carries the remainder over.

use serde::{Deserialize, Serialize};

use crate::item::{Item, ItemType};

/// Default experience needed per level
pub const DEFAULT_LEVEL_THRESHOLD: u64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProgression {
    pub exp: u64,
    pub level: u32,
    pub level_threshold: u64,
    pub inventory: Vec<Item>,
}

impl Default for PlayerProgression {
    fn default() -> Self {
        Self::new(0, 0, DEFAULT_LEVEL_THRESHOLD)
    }
}

impl PlayerProgression {
    pub fn new(exp: u64, level: u32, level_threshold: u64) -> Self {
        Self {
            exp,
            level,
            level_threshold,
            inventory: Vec::new(),
        }
    }

    /// Add experience, returning the number of levels gained
    pub fn add_exp(&mut self, amount: u64) -> u32 {
        self.exp = self.exp.saturating_add(amount);

        // A zero threshold disables leveling
        if self.level_threshold == 0 {
            return 0;
        }

        let crossed = self.exp / self.level_threshold;
        self.exp %= self.level_threshold;

        // Level saturates at u32::MAX; report only the levels actually gained
        let before = self.level;
        self.level = u32::try_from(crossed)
            .map_or(u32::MAX, |crossed| self.level.saturating_add(crossed));
        self.level - before
    }

    /// Experience still needed for the next level
    pub fn exp_to_next_level(&self) -> u64 {
        self.level_threshold.saturating_sub(self.exp)
    }

    /// Progress within the current level (0.0 to 1.0)
    pub fn level_progress(&self) -> f32 {
        if self.level_threshold == 0 {
            return 1.0;
        }
        (self.exp as f32 / self.level_threshold as f32).clamp(0.0, 1.0)
    }

    pub fn add_item(&mut self, item: Item) {
        self.inventory.push(item);
    }

    /// Number of inventory items of a given type
    pub fn count_items(&self, item_type: ItemType) -> usize {
        self.inventory
            .iter()
            .filter(|item| item.item_type == item_type)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exp_levels_up_and_carries_remainder() {
        let mut progression = PlayerProgression::new(0, 0, 100);

        assert_eq!(progression.add_exp(60), 0);
        assert_eq!(progression.exp_to_next_level(), 40);

        assert_eq!(progression.add_exp(60), 1);
        assert_eq!(progression.level, 1);
        assert_eq!(progression.exp, 20);

        assert_eq!(progression.add_exp(250), 2);
        assert_eq!(progression.level, 3);
        assert_eq!(progression.exp, 70);
    }

    #[test]
    fn test_large_grant_levels_in_one_step() {
        let mut progression = PlayerProgression::new(0, 0, 1);
        assert_eq!(progression.add_exp(1_000_000_000_000_000), u32::MAX);
        assert_eq!(progression.level, u32::MAX);
        assert_eq!(progression.exp, 0);

        let mut progression = PlayerProgression::new(5, 2, 1000);
        assert_eq!(progression.add_exp(10_000_000_000), 10_000_000);
        assert_eq!(progression.level, 10_000_002);
        assert_eq!(progression.exp, 5);
    }

    #[test]
    fn test_level_saturates_at_max() {
        let mut progression = PlayerProgression::new(0, u32::MAX, 100);
        assert_eq!(progression.add_exp(100), 0);
        assert_eq!(progression.level, u32::MAX);
        assert_eq!(progression.exp, 0);

        let mut progression = PlayerProgression::new(0, u32::MAX - 1, 100);
        assert_eq!(progression.add_exp(500), 1);
        assert_eq!(progression.level, u32::MAX);
    }

    #[test]
    fn test_zero_threshold_never_levels() {
        let mut progression = PlayerProgression::new(0, 4, 0);
        assert_eq!(progression.add_exp(1000), 0);
        assert_eq!(progression.level, 4);
        assert_eq!(progression.level_progress(), 1.0);
    }

    #[test]
    fn test_inventory_counts() {
        let mut progression = PlayerProgression::default();
        progression.add_item(Item::new(100, "Cookie100", ItemType::Cookie));
        progression.add_item(Item::new(101, "Cookie101", ItemType::Cookie));

        assert_eq!(progression.count_items(ItemType::Cookie), 2);
        assert_eq!(progression.count_items(ItemType::Branch), 0);
    }
}
