//! Quest State Tracking
//!
//! A quest owns its goals and rewards and moves through
//! `Inactive -> Active -> Completed`. Completion is terminal.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::events::GameplayEvent;
use super::goal::{Goal, GoalId, GoalUpdate};
use super::observer::{ObserverList, QuestObserver, QuestNotification};
use super::reward::{Reward, RewardGrant};
use crate::error::QuestError;
use crate::progression::PlayerProgression;

/// Quest identifier, unique within a quest handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestId(pub u32);

impl fmt::Display for QuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of a quest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    /// Waiting for its prerequisite, ignores gameplay events
    Inactive,
    /// Receives goal progress
    Active,
    /// All goals complete, rewards applied
    Completed,
}

impl QuestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestStatus::Inactive => "inactive",
            QuestStatus::Active => "active",
            QuestStatus::Completed => "completed",
        }
    }
}

/// What delivering one event to a quest changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestUpdate {
    pub goals_progressed: Vec<GoalId>,
    pub goals_completed: Vec<GoalId>,
    /// Whether the quest completed during this event
    pub completed: bool,
    pub grants: Vec<RewardGrant>,
}

#[derive(Debug, Clone)]
pub struct Quest {
    id: QuestId,
    name: String,
    status: QuestStatus,
    goals: Vec<Goal>,
    rewards: Vec<Reward>,
    observers: ObserverList,
    activated_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl Quest {
    pub fn new(id: QuestId) -> Self {
        Self {
            id,
            name: format!("Quest {}", id),
            status: QuestStatus::Inactive,
            goals: Vec::new(),
            rewards: Vec::new(),
            observers: ObserverList::new(),
            activated_at: None,
            completed_at: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn id(&self) -> QuestId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> QuestStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == QuestStatus::Active
    }

    pub fn is_completed(&self) -> bool {
        self.status == QuestStatus::Completed
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn goal(&self, goal_id: GoalId) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id() == goal_id)
    }

    pub fn rewards(&self) -> &[Reward] {
        &self.rewards
    }

    pub fn activated_at(&self) -> Option<DateTime<Utc>> {
        self.activated_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Attach a goal. Rejected once the quest is completed.
    pub fn add_goal(&mut self, goal: Goal) -> Result<(), QuestError> {
        self.ensure_open()?;
        if self.goal(goal.id()).is_some() {
            return Err(QuestError::DuplicateGoal(goal.id()));
        }
        self.goals.push(goal);
        Ok(())
    }

    /// Attach a reward. Rejected once the quest is completed.
    pub fn add_reward(&mut self, reward: Reward) -> Result<(), QuestError> {
        self.ensure_open()?;
        if self.rewards.iter().any(|r| r.id() == reward.id()) {
            return Err(QuestError::DuplicateReward {
                quest: self.id,
                reward: reward.id(),
            });
        }
        self.rewards.push(reward);
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), QuestError> {
        if self.is_completed() {
            return Err(QuestError::QuestCompleted(self.id));
        }
        Ok(())
    }

    /// Register an observer. Returns false if it was already registered.
    pub fn add_observer(&mut self, observer: Arc<dyn QuestObserver>) -> bool {
        self.observers.attach(observer)
    }

    /// Register an observer on one of this quest's goals
    pub fn add_goal_observer(
        &mut self,
        goal_id: GoalId,
        observer: Arc<dyn QuestObserver>,
    ) -> Result<bool, QuestError> {
        let goal = self
            .goals
            .iter_mut()
            .find(|g| g.id() == goal_id)
            .ok_or(QuestError::UnknownGoal(goal_id))?;
        Ok(goal.add_observer(observer))
    }

    /// Register an observer on this quest and all of its goals
    pub fn observe_all(&mut self, observer: Arc<dyn QuestObserver>) {
        for goal in &mut self.goals {
            goal.add_observer(Arc::clone(&observer));
        }
        self.observers.attach(observer);
    }

    /// Toggle eligibility for goal progress. Ignored once completed.
    ///
    /// Returns true if the status changed.
    pub fn set_active(&mut self, active: bool) -> bool {
        match (self.status, active) {
            (QuestStatus::Inactive, true) => {
                self.status = QuestStatus::Active;
                self.activated_at = Some(Utc::now());
                info!("Quest {} ({}) is now active", self.id, self.name);
                self.observers
                    .notify(&QuestNotification::QuestActivated { quest_id: self.id });
                true
            }
            (QuestStatus::Active, false) => {
                self.status = QuestStatus::Inactive;
                info!("Quest {} ({}) is now inactive", self.id, self.name);
                self.observers
                    .notify(&QuestNotification::QuestDeactivated { quest_id: self.id });
                true
            }
            _ => false,
        }
    }

    /// Route a gameplay event to every matching goal.
    ///
    /// Inactive and completed quests ignore events.
    pub fn handle_event(
        &mut self,
        event: &GameplayEvent,
        progression: &mut PlayerProgression,
    ) -> QuestUpdate {
        let mut update = QuestUpdate::default();
        if !self.is_active() {
            return update;
        }

        for index in 0..self.goals.len() {
            let goal = &mut self.goals[index];
            let Some(amount) = goal.progress_for(event) else {
                continue;
            };

            match goal.report_progress(amount) {
                GoalUpdate::Unchanged => {}
                GoalUpdate::Progressed => update.goals_progressed.push(goal.id()),
                GoalUpdate::Completed => {
                    let goal_id = goal.id();
                    update.goals_progressed.push(goal_id);
                    update.goals_completed.push(goal_id);
                    if let Some(grants) = self.on_goal_completed(progression) {
                        update.completed = true;
                        update.grants = grants;
                    }
                }
            }
        }

        update
    }

    /// Complete the quest if every goal is done.
    ///
    /// Returns the reward grants when this call completed the quest.
    pub fn on_goal_completed(
        &mut self,
        progression: &mut PlayerProgression,
    ) -> Option<Vec<RewardGrant>> {
        if self.is_completed() || self.goals.is_empty() {
            return None;
        }
        if !self.goals.iter().all(|g| g.is_completed()) {
            return None;
        }
        Some(self.complete(progression))
    }

    fn complete(&mut self, progression: &mut PlayerProgression) -> Vec<RewardGrant> {
        self.status = QuestStatus::Completed;
        self.completed_at = Some(Utc::now());
        info!("Quest {} ({}) completed", self.id, self.name);

        let mut grants = Vec::with_capacity(self.rewards.len());
        for reward in &self.rewards {
            let grant = reward.apply(progression);
            self.observers.notify(&QuestNotification::RewardGranted {
                quest_id: self.id,
                grant: grant.clone(),
            });
            if grant.levels_gained() > 0 {
                self.observers.notify(&QuestNotification::LevelUp {
                    quest_id: self.id,
                    level: progression.level,
                });
            }
            grants.push(grant);
        }

        self.observers
            .notify(&QuestNotification::QuestCompleted { quest_id: self.id });
        grants
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemType;
    use crate::quest::observer::tests::Recorder;
    use crate::quest::reward::RewardId;

    fn collect_goal(id: u32, item_type: ItemType, count: u32) -> Goal {
        let mut goal = Goal::collect(GoalId(id), item_type);
        goal.set_goal_count(count).unwrap();
        goal
    }

    #[test]
    fn test_quest_completes_when_all_goals_complete() {
        let mut progression = PlayerProgression::default();
        let mut quest = Quest::new(QuestId(1));
        quest.add_goal(collect_goal(1, ItemType::Branch, 2)).unwrap();
        quest.add_goal(collect_goal(3, ItemType::Cookie, 1)).unwrap();
        quest.add_reward(Reward::exp(RewardId(1), 100)).unwrap();
        quest.set_active(true);

        let update = quest.handle_event(&GameplayEvent::collected(ItemType::Branch, 2), &mut progression);
        assert_eq!(update.goals_completed, vec![GoalId(1)]);
        assert!(!update.completed);
        assert_eq!(quest.status(), QuestStatus::Active);

        let update = quest.handle_event(&GameplayEvent::collected(ItemType::Cookie, 1), &mut progression);
        assert!(update.completed);
        assert_eq!(update.grants.len(), 1);
        assert_eq!(quest.status(), QuestStatus::Completed);
        assert!(quest.completed_at().is_some());
        assert_eq!(progression.level, 1);
    }

    #[test]
    fn test_rewards_apply_once_when_goals_complete_together() {
        let recorder = Recorder::shared();
        let mut progression = PlayerProgression::new(0, 0, 1000);
        let mut quest = Quest::new(QuestId(1));
        quest.add_goal(Goal::kill(GoalId(1))).unwrap();
        quest.add_goal(Goal::kill(GoalId(2))).unwrap();
        quest.add_reward(Reward::exp(RewardId(1), 100)).unwrap();
        quest.add_observer(recorder.clone());
        quest.set_active(true);

        let update = quest.handle_event(&GameplayEvent::killed("ant"), &mut progression);
        assert_eq!(update.goals_completed, vec![GoalId(1), GoalId(2)]);
        assert!(update.completed);

        quest.handle_event(&GameplayEvent::killed("ant"), &mut progression);
        assert_eq!(quest.on_goal_completed(&mut progression), None);

        assert_eq!(progression.exp, 100);
        let completions: Vec<_> = recorder
            .all()
            .into_iter()
            .filter(|n| matches!(n, QuestNotification::QuestCompleted { .. }))
            .collect();
        assert_eq!(completions.len(), 1);
    }

    #[test]
    fn test_inactive_quest_ignores_events() {
        let mut progression = PlayerProgression::default();
        let mut quest = Quest::new(QuestId(2));
        quest.add_goal(Goal::eaten(GoalId(2))).unwrap();

        let update = quest.handle_event(&GameplayEvent::eaten("ant"), &mut progression);

        assert_eq!(update, QuestUpdate::default());
        assert_eq!(quest.goals()[0].current_count(), 0);
    }

    #[test]
    fn test_completed_quest_rejects_goals_and_rewards() {
        let mut progression = PlayerProgression::default();
        let mut quest = Quest::new(QuestId(1));
        quest.add_goal(Goal::kill(GoalId(1))).unwrap();
        quest.set_active(true);
        quest.handle_event(&GameplayEvent::killed("ant"), &mut progression);
        assert!(quest.is_completed());

        assert_eq!(
            quest.add_goal(Goal::kill(GoalId(5))),
            Err(QuestError::QuestCompleted(QuestId(1)))
        );
        assert_eq!(
            quest.add_reward(Reward::exp(RewardId(1), 10)),
            Err(QuestError::QuestCompleted(QuestId(1)))
        );
        assert_eq!(quest.goals().len(), 1);
        assert!(quest.rewards().is_empty());
        assert_eq!(quest.status(), QuestStatus::Completed);
    }

    #[test]
    fn test_completed_quest_cannot_be_reactivated() {
        let mut progression = PlayerProgression::default();
        let mut quest = Quest::new(QuestId(1));
        quest.add_goal(Goal::kill(GoalId(1))).unwrap();
        quest.set_active(true);
        quest.handle_event(&GameplayEvent::killed("ant"), &mut progression);

        assert!(!quest.set_active(true));
        assert!(!quest.set_active(false));
        assert_eq!(quest.status(), QuestStatus::Completed);
    }

    #[test]
    fn test_completion_notifies_rewards_before_quest_completed() {
        let recorder = Recorder::shared();
        let mut progression = PlayerProgression::new(0, 0, 100);
        let mut quest = Quest::new(QuestId(4));
        quest.add_goal(Goal::kill(GoalId(4))).unwrap();
        quest.add_reward(Reward::exp(RewardId(1), 100)).unwrap();
        quest.observe_all(recorder.clone());
        quest.set_active(true);

        quest.handle_event(&GameplayEvent::killed("ant"), &mut progression);

        let kinds: Vec<_> = recorder.all().iter().map(|n| n.event_type()).collect();
        assert_eq!(
            kinds,
            vec![
                "quest_activated",
                "goal_completed",
                "reward_granted",
                "level_up",
                "quest_completed",
            ]
        );
    }

    #[test]
    fn test_duplicate_goal_in_quest_is_rejected() {
        let mut quest = Quest::new(QuestId(1));
        quest.add_goal(Goal::kill(GoalId(1))).unwrap();
        assert_eq!(
            quest.add_goal(Goal::eaten(GoalId(1))),
            Err(QuestError::DuplicateGoal(GoalId(1)))
        );
    }
}
