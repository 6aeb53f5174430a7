//! Quest Definition Structures
//!
//! Quest lines are written in TOML. Raw structures mirror the file layout
//! and are resolved into validated definitions, which build the runtime
//! `Quest` values.

use std::path::Path;

use serde::Deserialize;

use super::goal::{Goal, GoalId, GoalKind};
use super::reward::{Reward, RewardId};
use super::state::{Quest, QuestId};
use crate::error::{LoadError, QuestError};
use crate::item::{Item, ItemType};

/// A quest-line file: any number of quests
#[derive(Debug, Clone, Deserialize)]
pub struct RawQuestFile {
    #[serde(default)]
    pub quests: Vec<RawQuest>,
}

/// Raw quest data as it appears in TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RawQuest {
    pub id: u32,
    pub name: Option<String>,
    /// Quest that must be completed before this one activates
    pub previous: Option<u32>,
    /// Kept out of the quest graph and active from the start
    #[serde(default)]
    pub standalone: bool,
    #[serde(default)]
    pub goals: Vec<RawGoal>,
    #[serde(default)]
    pub rewards: Vec<RawReward>,
}

/// Raw goal as it appears in TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RawGoal {
    pub id: u32,
    #[serde(rename = "type")]
    pub goal_type: String,
    #[serde(default = "default_count")]
    pub count: u32,
    pub item_type: Option<String>,
    pub target: Option<String>,
}

fn default_count() -> u32 {
    1
}

/// Raw reward as it appears in TOML
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawReward {
    Exp { id: u32, exp: u64 },
    Item {
        id: u32,
        #[serde(default)]
        items: Vec<Item>,
    },
}

// ============================================================================
// Resolved Definitions (after parsing)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalDefinition {
    pub id: GoalId,
    pub kind: GoalKind,
    pub count: u32,
    pub item_type: Option<ItemType>,
    pub target: Option<String>,
}

impl GoalDefinition {
    pub fn from_raw(raw: &RawGoal) -> Result<Self, LoadError> {
        let kind = GoalKind::from_str(&raw.goal_type).ok_or_else(|| {
            LoadError::Definition(format!("goal {} has unknown type '{}'", raw.id, raw.goal_type))
        })?;

        let item_type = match &raw.item_type {
            Some(name) => Some(ItemType::from_str(name).ok_or_else(|| {
                LoadError::Definition(format!("goal {} has unknown item type '{}'", raw.id, name))
            })?),
            None => None,
        };

        Ok(Self {
            id: GoalId(raw.id),
            kind,
            count: raw.count,
            item_type,
            target: raw.target.clone(),
        })
    }

    pub fn build(&self) -> Result<Goal, QuestError> {
        let mut goal = Goal::new(self.id, self.kind);
        goal.set_goal_count(self.count)?;
        if let Some(item_type) = self.item_type {
            goal.set_item_type(item_type)?;
        }
        if let Some(target) = &self.target {
            goal.set_target(target.clone())?;
        }
        Ok(goal)
    }
}

/// A fully resolved quest definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestDefinition {
    pub id: QuestId,
    pub name: Option<String>,
    pub previous: Option<QuestId>,
    pub standalone: bool,
    pub goals: Vec<GoalDefinition>,
    pub rewards: Vec<Reward>,
}

impl QuestDefinition {
    /// Create a definition from raw TOML data
    pub fn from_raw(raw: &RawQuest) -> Result<Self, LoadError> {
        if raw.goals.is_empty() {
            return Err(LoadError::Definition(format!("quest {} has no goals", raw.id)));
        }
        if raw.standalone && raw.previous.is_some() {
            return Err(LoadError::Definition(format!(
                "quest {} is standalone but names a previous quest",
                raw.id
            )));
        }

        let goals = raw
            .goals
            .iter()
            .map(GoalDefinition::from_raw)
            .collect::<Result<Vec<_>, _>>()?;

        let rewards = raw
            .rewards
            .iter()
            .map(|r| match r {
                RawReward::Exp { id, exp } => Reward::exp(RewardId(*id), *exp),
                RawReward::Item { id, items } => Reward::items(RewardId(*id), items.clone()),
            })
            .collect();

        Ok(Self {
            id: QuestId(raw.id),
            name: raw.name.clone(),
            previous: raw.previous.map(QuestId),
            standalone: raw.standalone,
            goals,
            rewards,
        })
    }

    /// Build a fresh, inactive quest
    pub fn build(&self) -> Result<Quest, QuestError> {
        let mut quest = Quest::new(self.id);
        if let Some(name) = &self.name {
            quest = quest.with_name(name.clone());
        }
        for goal in &self.goals {
            quest.add_goal(goal.build()?)?;
        }
        for reward in &self.rewards {
            quest.add_reward(reward.clone())?;
        }
        Ok(quest)
    }
}

/// Parse and resolve every quest in a TOML document, failing on the first bad quest.
///
/// `path` is only used for error reporting.
pub fn resolve_quest_file(content: &str, path: &Path) -> Result<Vec<QuestDefinition>, LoadError> {
    let raw: RawQuestFile = toml::from_str(content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    raw.quests.iter().map(QuestDefinition::from_raw).collect()
}
