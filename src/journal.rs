//! Quest journal: the level/UI view of quest state.
//!
//! Built purely from notifications, so it can be attached to any number of
//! quests and goals and shown or saved without touching the handler.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;

use crate::quest::{GoalId, QuestId, QuestNotification, QuestObserver, QuestStatus, RewardGrant};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestEntry {
    pub status: QuestStatus,
    pub activated_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub rewards: Vec<RewardGrant>,
}

impl QuestEntry {
    fn new() -> Self {
        Self {
            status: QuestStatus::Inactive,
            activated_at: None,
            completed_at: None,
            rewards: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalEntry {
    pub current: u32,
    /// Unknown until the goal reports progress
    pub target: Option<u32>,
    pub completed: bool,
}

/// Everything the journal has seen, ordered by id
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JournalSnapshot {
    pub quests: BTreeMap<QuestId, QuestEntry>,
    pub goals: BTreeMap<GoalId, GoalEntry>,
    pub level: Option<u32>,
}

#[derive(Debug, Default)]
pub struct QuestJournal {
    state: Mutex<JournalSnapshot>,
}

impl QuestJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> JournalSnapshot {
        self.state.lock().clone()
    }

    pub fn status_of(&self, quest_id: QuestId) -> Option<QuestStatus> {
        self.state.lock().quests.get(&quest_id).map(|q| q.status)
    }

    pub fn completed_quests(&self) -> Vec<QuestId> {
        self.state
            .lock()
            .quests
            .iter()
            .filter(|(_, q)| q.status == QuestStatus::Completed)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Human-readable journal lines
    pub fn lines(&self) -> Vec<String> {
        let state = self.state.lock();
        let mut lines: Vec<String> = state
            .quests
            .iter()
            .map(|(id, entry)| {
                let exp: u64 = entry.rewards.iter().map(RewardGrant::exp).sum();
                format!("Quest {}: {} (+{} exp)", id, entry.status.as_str(), exp)
            })
            .collect();
        lines.extend(state.goals.iter().map(|(id, goal)| match goal.target {
            _ if goal.completed => format!("Goal {}: done", id),
            Some(target) => format!("Goal {}: {}/{}", id, goal.current, target),
            None => format!("Goal {}: {}", id, goal.current),
        }));
        lines
    }
}

impl QuestObserver for QuestJournal {
    fn notify(&self, notification: &QuestNotification) {
        let mut state = self.state.lock();
        match notification {
            QuestNotification::GoalProgressed {
                goal_id,
                current,
                target,
            } => {
                let goal = state.goals.entry(*goal_id).or_insert(GoalEntry {
                    current: 0,
                    target: None,
                    completed: false,
                });
                goal.current = *current;
                goal.target = Some(*target);
            }
            QuestNotification::GoalCompleted { goal_id } => {
                let goal = state.goals.entry(*goal_id).or_insert(GoalEntry {
                    current: 0,
                    target: None,
                    completed: false,
                });
                if let Some(target) = goal.target {
                    goal.current = target;
                }
                goal.completed = true;
            }
            QuestNotification::QuestActivated { quest_id } => {
                let entry = state.quests.entry(*quest_id).or_insert_with(QuestEntry::new);
                entry.status = QuestStatus::Active;
                entry.activated_at = Some(Utc::now());
            }
            QuestNotification::QuestDeactivated { quest_id } => {
                let entry = state.quests.entry(*quest_id).or_insert_with(QuestEntry::new);
                entry.status = QuestStatus::Inactive;
            }
            QuestNotification::QuestCompleted { quest_id } => {
                let entry = state.quests.entry(*quest_id).or_insert_with(QuestEntry::new);
                entry.status = QuestStatus::Completed;
                entry.completed_at = Some(Utc::now());
            }
            QuestNotification::RewardGranted { quest_id, grant } => {
                state
                    .quests
                    .entry(*quest_id)
                    .or_insert_with(QuestEntry::new)
                    .rewards
                    .push(grant.clone());
            }
            QuestNotification::LevelUp { level, .. } => {
                state.level = Some(*level);
            }
        }
    }
}
