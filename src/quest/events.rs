//! Quest Event Types
//!
//! Gameplay events that can trigger goal progress, and the summary of what
//! one event changed.

use serde::{Deserialize, Serialize};

use super::goal::GoalId;
use super::reward::RewardGrant;
use super::state::QuestId;
use crate::item::ItemType;

/// Events reported by gameplay systems (combat, consumption, pickups)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameplayEvent {
    /// An actor was killed
    Killed {
        /// Identifier of the killed actor (e.g., "ant")
        target: String,
    },

    /// An actor was eaten
    Eaten { target: String },

    /// The player picked up items
    Collected {
        item_type: ItemType,
        #[serde(default = "default_amount")]
        amount: u32,
    },
}

fn default_amount() -> u32 {
    1
}

impl GameplayEvent {
    pub fn killed(target: impl Into<String>) -> Self {
        GameplayEvent::Killed {
            target: target.into(),
        }
    }

    pub fn eaten(target: impl Into<String>) -> Self {
        GameplayEvent::Eaten {
            target: target.into(),
        }
    }

    pub fn collected(item_type: ItemType, amount: u32) -> Self {
        GameplayEvent::Collected { item_type, amount }
    }

    /// Get event type as string (for logging/debugging)
    pub fn event_type(&self) -> &'static str {
        match self {
            GameplayEvent::Killed { .. } => "killed",
            GameplayEvent::Eaten { .. } => "eaten",
            GameplayEvent::Collected { .. } => "collected",
        }
    }
}

/// Everything that changed while resolving a single gameplay event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventOutcome {
    /// Goals that moved forward, including the ones that completed
    pub goals_progressed: Vec<GoalId>,
    pub goals_completed: Vec<GoalId>,
    pub quests_completed: Vec<QuestId>,
    /// Quests unlocked by a completed prerequisite
    pub quests_activated: Vec<QuestId>,
    pub rewards_granted: Vec<(QuestId, RewardGrant)>,
}

impl EventOutcome {
    /// True when the event matched no goal on any active quest
    pub fn is_unchanged(&self) -> bool {
        self.goals_progressed.is_empty()
            && self.goals_completed.is_empty()
            && self.quests_completed.is_empty()
            && self.quests_activated.is_empty()
    }

    /// Total experience granted by rewards during this event
    pub fn exp_granted(&self) -> u64 {
        self.rewards_granted
            .iter()
            .map(|(_, grant)| grant.exp())
            .sum()
    }
}
