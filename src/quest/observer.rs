//! Quest Notifications
//!
//! Goals and quests report their state transitions to registered observers.
//! Observers are shared handles with their own lifetime: a subject only
//! ever calls `notify` on them and never owns them.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::goal::GoalId;
use super::reward::RewardGrant;
use super::state::QuestId;

/// Receiver of quest system notifications.
///
/// One observer may be attached to many goals and quests at once, so
/// implementations keep any mutable state behind their own lock.
pub trait QuestObserver: Send + Sync {
    fn notify(&self, notification: &QuestNotification);
}

/// State transitions broadcast by goals and quests
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum QuestNotification {
    /// A goal moved forward without completing
    GoalProgressed {
        goal_id: GoalId,
        current: u32,
        target: u32,
    },
    GoalCompleted { goal_id: GoalId },
    /// A quest became eligible for goal progress
    QuestActivated { quest_id: QuestId },
    /// An active quest stopped receiving goal progress
    QuestDeactivated { quest_id: QuestId },
    QuestCompleted { quest_id: QuestId },
    /// One of a completed quest's rewards was applied
    RewardGranted { quest_id: QuestId, grant: RewardGrant },
    /// Experience from a quest reward raised the player's level
    LevelUp { quest_id: QuestId, level: u32 },
}

impl QuestNotification {
    /// Get notification type as string (for logging/debugging)
    pub fn event_type(&self) -> &'static str {
        match self {
            QuestNotification::GoalProgressed { .. } => "goal_progressed",
            QuestNotification::GoalCompleted { .. } => "goal_completed",
            QuestNotification::QuestActivated { .. } => "quest_activated",
            QuestNotification::QuestDeactivated { .. } => "quest_deactivated",
            QuestNotification::QuestCompleted { .. } => "quest_completed",
            QuestNotification::RewardGranted { .. } => "reward_granted",
            QuestNotification::LevelUp { .. } => "level_up",
        }
    }

    /// Whether this is a goal or quest completion
    pub fn is_completion(&self) -> bool {
        matches!(
            self,
            QuestNotification::GoalCompleted { .. } | QuestNotification::QuestCompleted { .. }
        )
    }
}

/// The observers registered on a single subject, in registration order
#[derive(Clone, Default)]
pub struct ObserverList {
    observers: Vec<Arc<dyn QuestObserver>>,
}

impl ObserverList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer. Returns false if this exact observer is already registered.
    pub fn attach(&mut self, observer: Arc<dyn QuestObserver>) -> bool {
        if self.contains(&observer) {
            return false;
        }
        self.observers.push(observer);
        true
    }

    pub fn contains(&self, observer: &Arc<dyn QuestObserver>) -> bool {
        let target = Arc::as_ptr(observer) as *const ();
        self.observers
            .iter()
            .any(|existing| Arc::as_ptr(existing) as *const () == target)
    }

    /// Deliver a notification to every observer synchronously
    pub fn notify(&self, notification: &QuestNotification) {
        for observer in &self.observers {
            observer.notify(notification);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl fmt::Debug for ObserverList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverList")
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use parking_lot::Mutex;

    /// Observer that records every notification it receives
    #[derive(Default)]
    pub(crate) struct Recorder {
        pub(crate) received: Mutex<Vec<QuestNotification>>,
    }

    impl Recorder {
        pub(crate) fn shared() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub(crate) fn all(&self) -> Vec<QuestNotification> {
            self.received.lock().clone()
        }

        pub(crate) fn completions(&self) -> Vec<QuestNotification> {
            self.received
                .lock()
                .iter()
                .filter(|n| n.is_completion())
                .cloned()
                .collect()
        }
    }

    impl QuestObserver for Recorder {
        fn notify(&self, notification: &QuestNotification) {
            self.received.lock().push(notification.clone());
        }
    }

    #[test]
    fn test_attach_ignores_same_observer_twice() {
        let recorder = Recorder::shared();
        let mut list = ObserverList::new();

        assert!(list.attach(recorder.clone()));
        assert!(!list.attach(recorder.clone()));
        assert_eq!(list.len(), 1);

        list.notify(&QuestNotification::QuestCompleted { quest_id: QuestId(1) });
        assert_eq!(recorder.all().len(), 1);
    }

    #[test]
    fn test_notify_fans_out_in_order() {
        let first = Recorder::shared();
        let second = Recorder::shared();
        let mut list = ObserverList::new();
        list.attach(first.clone());
        list.attach(second.clone());

        let completed = QuestNotification::GoalCompleted { goal_id: GoalId(3) };
        let activated = QuestNotification::QuestActivated { quest_id: QuestId(2) };
        list.notify(&completed);
        list.notify(&activated);

        assert_eq!(first.all(), vec![completed.clone(), activated.clone()]);
        assert_eq!(second.all(), vec![completed, activated]);
    }

    #[test]
    fn test_notification_serializes_with_event_tag() {
        let json = serde_json::to_value(QuestNotification::GoalCompleted { goal_id: GoalId(7) })
            .unwrap();
        assert_eq!(json["event"], "goal_completed");
        assert_eq!(json["goal_id"], 7);
    }
}
