//! Quest Rewards
//!
//! Effects applied to the player when the owning quest completes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::item::Item;
use crate::progression::PlayerProgression;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RewardId(pub u32);

impl fmt::Display for RewardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reward {
    /// Grants experience
    Exp { id: RewardId, amount: u64 },
    /// Grants a set of items
    Item { id: RewardId, items: Vec<Item> },
}

impl Reward {
    pub fn exp(id: RewardId, amount: u64) -> Self {
        Reward::Exp { id, amount }
    }

    pub fn items(id: RewardId, items: Vec<Item>) -> Self {
        Reward::Item { id, items }
    }

    pub fn id(&self) -> RewardId {
        match self {
            Reward::Exp { id, .. } | Reward::Item { id, .. } => *id,
        }
    }

    /// Add an item to an item reward. Returns false for other reward kinds.
    pub fn add_item(&mut self, item: Item) -> bool {
        match self {
            Reward::Item { items, .. } => {
                items.push(item);
                true
            }
            Reward::Exp { .. } => false,
        }
    }

    /// Apply the reward to the player
    pub fn apply(&self, progression: &mut PlayerProgression) -> RewardGrant {
        match self {
            Reward::Exp { id, amount } => {
                let levels_gained = progression.add_exp(*amount);
                RewardGrant::Exp {
                    reward_id: *id,
                    amount: *amount,
                    levels_gained,
                    level: progression.level,
                }
            }
            Reward::Item { id, items } => {
                for item in items {
                    progression.add_item(item.clone());
                }
                RewardGrant::Items {
                    reward_id: *id,
                    items: items.clone(),
                }
            }
        }
    }
}

/// What a single reward application gave the player
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RewardGrant {
    Exp {
        reward_id: RewardId,
        amount: u64,
        levels_gained: u32,
        /// Player level after the grant
        level: u32,
    },
    Items {
        reward_id: RewardId,
        items: Vec<Item>,
    },
}

impl RewardGrant {
    pub fn reward_id(&self) -> RewardId {
        match self {
            RewardGrant::Exp { reward_id, .. } | RewardGrant::Items { reward_id, .. } => *reward_id,
        }
    }

    pub fn exp(&self) -> u64 {
        match self {
            RewardGrant::Exp { amount, .. } => *amount,
            RewardGrant::Items { .. } => 0,
        }
    }

    pub fn levels_gained(&self) -> u32 {
        match self {
            RewardGrant::Exp { levels_gained, .. } => *levels_gained,
            RewardGrant::Items { .. } => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemType;

    #[test]
    fn test_exp_reward_levels_player() {
        let mut progression = PlayerProgression::new(0, 0, 100);
        let reward = Reward::exp(RewardId(1), 100);

        let grant = reward.apply(&mut progression);

        assert_eq!(
            grant,
            RewardGrant::Exp {
                reward_id: RewardId(1),
                amount: 100,
                levels_gained: 1,
                level: 1,
            }
        );
        assert_eq!(progression.level, 1);
        assert_eq!(progression.exp, 0);
    }

    #[test]
    fn test_item_reward_fills_inventory() {
        let mut progression = PlayerProgression::default();
        let mut reward = Reward::items(RewardId(2), Vec::new());
        assert!(reward.add_item(Item::new(100, "Cookie100", ItemType::Cookie)));

        let grant = reward.apply(&mut progression);

        assert_eq!(grant.reward_id(), RewardId(2));
        assert_eq!(grant.exp(), 0);
        assert_eq!(progression.count_items(ItemType::Cookie), 1);
    }

    #[test]
    fn test_exp_reward_rejects_items() {
        let mut reward = Reward::exp(RewardId(1), 10);
        assert!(!reward.add_item(Item::new(1, "Branch", ItemType::Branch)));
    }
}
