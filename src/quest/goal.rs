//! Quest Goals
//!
//! A goal counts progress towards a single objective (kill, eat or collect)
//! and completes once its threshold is reached.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::events::GameplayEvent;
use super::observer::{ObserverList, QuestObserver, QuestNotification};
use crate::error::QuestError;
use crate::item::ItemType;

/// Goal identifier, unique within a quest handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalId(pub u32);

impl fmt::Display for GoalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which gameplay events a goal reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    /// Kill X actors
    Kill,
    /// Eat X actors
    Eaten,
    /// Collect X items of a type
    Collect,
}

impl GoalKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "kill" => Some(GoalKind::Kill),
            "eaten" | "eat" => Some(GoalKind::Eaten),
            "collect" => Some(GoalKind::Collect),
            _ => None,
        }
    }
}

/// Result of reporting progress on a goal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalUpdate {
    /// Nothing changed (already completed, or zero progress)
    Unchanged,
    Progressed,
    /// This call completed the goal
    Completed,
}

#[derive(Debug, Clone)]
pub struct Goal {
    id: GoalId,
    kind: GoalKind,
    goal_count: u32,
    current_count: u32,
    /// Only collect events of this type count (collect goals)
    item_type: Option<ItemType>,
    /// Only kill/eaten events for this actor count
    target: Option<String>,
    completed: bool,
    observers: ObserverList,
}

impl Goal {
    /// Create a goal with a threshold of 1
    pub fn new(id: GoalId, kind: GoalKind) -> Self {
        Self {
            id,
            kind,
            goal_count: 1,
            current_count: 0,
            item_type: None,
            target: None,
            completed: false,
            observers: ObserverList::new(),
        }
    }

    pub fn kill(id: GoalId) -> Self {
        Self::new(id, GoalKind::Kill)
    }

    pub fn eaten(id: GoalId) -> Self {
        Self::new(id, GoalKind::Eaten)
    }

    pub fn collect(id: GoalId, item_type: ItemType) -> Self {
        let mut goal = Self::new(id, GoalKind::Collect);
        goal.item_type = Some(item_type);
        goal
    }

    pub fn id(&self) -> GoalId {
        self.id
    }

    pub fn kind(&self) -> GoalKind {
        self.kind
    }

    pub fn goal_count(&self) -> u32 {
        self.goal_count
    }

    pub fn current_count(&self) -> u32 {
        self.current_count
    }

    pub fn item_type(&self) -> Option<ItemType> {
        self.item_type
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Whether any progress has been recorded
    pub fn has_started(&self) -> bool {
        self.current_count > 0 || self.completed
    }

    pub fn set_goal_count(&mut self, goal_count: u32) -> Result<(), QuestError> {
        self.ensure_configurable()?;
        if goal_count == 0 {
            return Err(QuestError::InvalidGoalCount(self.id));
        }
        self.goal_count = goal_count;
        Ok(())
    }

    pub fn set_item_type(&mut self, item_type: ItemType) -> Result<(), QuestError> {
        self.ensure_configurable()?;
        self.item_type = Some(item_type);
        Ok(())
    }

    pub fn set_target(&mut self, target: impl Into<String>) -> Result<(), QuestError> {
        self.ensure_configurable()?;
        self.target = Some(target.into());
        Ok(())
    }

    fn ensure_configurable(&self) -> Result<(), QuestError> {
        if self.has_started() {
            return Err(QuestError::GoalInProgress(self.id));
        }
        Ok(())
    }

    /// Register an observer. Returns false if it was already registered.
    pub fn add_observer(&mut self, observer: Arc<dyn QuestObserver>) -> bool {
        self.observers.attach(observer)
    }

    pub fn observers(&self) -> &ObserverList {
        &self.observers
    }

    /// Amount of progress an event is worth to this goal, if it matches at all
    pub fn progress_for(&self, event: &GameplayEvent) -> Option<u32> {
        match (self.kind, event) {
            (GoalKind::Kill, GameplayEvent::Killed { target })
            | (GoalKind::Eaten, GameplayEvent::Eaten { target }) => {
                match &self.target {
                    Some(wanted) if wanted != target => None,
                    _ => Some(1),
                }
            }
            (GoalKind::Collect, GameplayEvent::Collected { item_type, amount }) => {
                match self.item_type {
                    Some(wanted) if wanted != *item_type => None,
                    _ => Some(*amount),
                }
            }
            _ => None,
        }
    }

    /// Add progress, clamped at the goal count.
    ///
    /// Completion notifies observers before returning. Progress on a
    /// completed goal is ignored.
    pub fn report_progress(&mut self, amount: u32) -> GoalUpdate {
        if self.completed || amount == 0 {
            return GoalUpdate::Unchanged;
        }

        self.current_count = self.current_count.saturating_add(amount).min(self.goal_count);

        if self.current_count >= self.goal_count {
            self.completed = true;
            debug!("Goal {} completed ({}/{})", self.id, self.current_count, self.goal_count);
            self.observers
                .notify(&QuestNotification::GoalCompleted { goal_id: self.id });
            GoalUpdate::Completed
        } else {
            debug!("Goal {} progress {}/{}", self.id, self.current_count, self.goal_count);
            self.observers.notify(&QuestNotification::GoalProgressed {
                goal_id: self.id,
                current: self.current_count,
                target: self.goal_count,
            });
            GoalUpdate::Progressed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quest::observer::tests::Recorder;

    #[test]
    fn test_goal_progress_clamps_and_completes() {
        let mut goal = Goal::kill(GoalId(1));
        goal.set_goal_count(5).unwrap();

        assert_eq!(goal.report_progress(3), GoalUpdate::Progressed);
        assert!(!goal.is_completed());
        assert_eq!(goal.current_count(), 3);

        assert_eq!(goal.report_progress(4), GoalUpdate::Completed);
        assert!(goal.is_completed());
        assert_eq!(goal.current_count(), 5);
    }

    #[test]
    fn test_progress_on_completed_goal_is_ignored() {
        let recorder = Recorder::shared();
        let mut goal = Goal::eaten(GoalId(2));
        goal.add_observer(recorder.clone());

        assert_eq!(goal.report_progress(1), GoalUpdate::Completed);
        for _ in 0..3 {
            assert_eq!(goal.report_progress(1), GoalUpdate::Unchanged);
        }

        assert_eq!(goal.current_count(), 1);
        assert!(goal.is_completed());
        assert_eq!(
            recorder.all(),
            vec![QuestNotification::GoalCompleted { goal_id: GoalId(2) }]
        );
    }

    #[test]
    fn test_reconfiguring_started_goal_is_rejected() {
        let mut goal = Goal::collect(GoalId(3), ItemType::Branch);
        goal.set_goal_count(50).unwrap();
        goal.report_progress(1);

        assert_eq!(goal.set_goal_count(10), Err(QuestError::GoalInProgress(GoalId(3))));
        assert_eq!(
            goal.set_item_type(ItemType::Cookie),
            Err(QuestError::GoalInProgress(GoalId(3)))
        );
        assert_eq!(goal.goal_count(), 50);
        assert_eq!(goal.item_type(), Some(ItemType::Branch));
    }

    #[test]
    fn test_zero_goal_count_is_rejected() {
        let mut goal = Goal::kill(GoalId(4));
        assert_eq!(goal.set_goal_count(0), Err(QuestError::InvalidGoalCount(GoalId(4))));
        assert_eq!(goal.goal_count(), 1);
    }

    #[test]
    fn test_event_matching_by_kind() {
        let kill = Goal::kill(GoalId(1));
        let eat = Goal::eaten(GoalId(2));
        let branch = Goal::collect(GoalId(3), ItemType::Branch);

        let killed = GameplayEvent::killed("ant");
        let cookies = GameplayEvent::collected(ItemType::Cookie, 2);
        let branches = GameplayEvent::collected(ItemType::Branch, 4);

        assert_eq!(kill.progress_for(&killed), Some(1));
        assert_eq!(eat.progress_for(&killed), None);
        assert_eq!(branch.progress_for(&cookies), None);
        assert_eq!(branch.progress_for(&branches), Some(4));
    }

    #[test]
    fn test_targeted_kill_goal_ignores_other_actors() {
        let mut goal = Goal::kill(GoalId(1));
        goal.set_target("ant").unwrap();

        assert_eq!(goal.progress_for(&GameplayEvent::killed("ant")), Some(1));
        assert_eq!(goal.progress_for(&GameplayEvent::killed("spider")), None);
    }

    #[test]
    fn test_progress_notification_carries_counts() {
        let recorder = Recorder::shared();
        let mut goal = Goal::collect(GoalId(9), ItemType::Cookie);
        goal.set_goal_count(3).unwrap();
        goal.add_observer(recorder.clone());

        goal.report_progress(2);

        assert_eq!(
            recorder.all(),
            vec![QuestNotification::GoalProgressed {
                goal_id: GoalId(9),
                current: 2,
                target: 3,
            }]
        );
    }
}
