//! Sound cues for quest events.
//!
//! `SoundObserver` turns quest notifications into named cues and hands them
//! to whatever audio backend the host provides.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Deserialize;
use tracing::info;

use crate::quest::{QuestNotification, QuestObserver, RewardGrant};

/// Something that can play and stop named sounds
pub trait SoundBackend: Send + Sync {
    fn play(&self, cue: &str);
    fn stop(&self, cue: &str);
}

/// Cue names per notification. Unset cues stay silent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SoundCues {
    pub goal_completed: Option<String>,
    pub quest_activated: Option<String>,
    pub quest_completed: Option<String>,
    pub item_granted: Option<String>,
    pub level_up: Option<String>,
}

impl Default for SoundCues {
    fn default() -> Self {
        Self {
            goal_completed: None,
            quest_activated: None,
            quest_completed: Some("Quest".to_string()),
            item_granted: Some("Item".to_string()),
            level_up: None,
        }
    }
}

impl SoundCues {
    /// Cue for a notification, if one is configured
    pub fn cue_for(&self, notification: &QuestNotification) -> Option<&str> {
        let cue = match notification {
            QuestNotification::GoalProgressed { .. } => None,
            QuestNotification::GoalCompleted { .. } => self.goal_completed.as_ref(),
            QuestNotification::QuestActivated { .. } => self.quest_activated.as_ref(),
            QuestNotification::QuestDeactivated { .. } => None,
            QuestNotification::QuestCompleted { .. } => self.quest_completed.as_ref(),
            QuestNotification::RewardGranted {
                grant: RewardGrant::Items { .. },
                ..
            } => self.item_granted.as_ref(),
            QuestNotification::RewardGranted { .. } => None,
            QuestNotification::LevelUp { .. } => self.level_up.as_ref(),
        };
        cue.map(String::as_str)
    }
}

pub struct SoundObserver {
    cues: SoundCues,
    backend: Arc<dyn SoundBackend>,
}

impl SoundObserver {
    pub fn new(cues: SoundCues, backend: Arc<dyn SoundBackend>) -> Self {
        Self { cues, backend }
    }
}

impl QuestObserver for SoundObserver {
    fn notify(&self, notification: &QuestNotification) {
        if let QuestNotification::QuestDeactivated { .. } = notification {
            // The activation cue may still be playing
            if let Some(cue) = &self.cues.quest_activated {
                self.backend.stop(cue);
            }
            return;
        }
        if let Some(cue) = self.cues.cue_for(notification) {
            self.backend.play(cue);
        }
    }
}

/// Backend for headless runs: logs each cue and keeps a history
#[derive(Debug, Default)]
pub struct LoggingSoundBackend {
    played: Mutex<Vec<String>>,
    stopped: Mutex<Vec<String>>,
}

impl LoggingSoundBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cues played so far, oldest first
    pub fn played(&self) -> Vec<String> {
        self.played.lock().clone()
    }

    /// Cues stopped so far, oldest first
    pub fn stopped(&self) -> Vec<String> {
        self.stopped.lock().clone()
    }
}

impl SoundBackend for LoggingSoundBackend {
    fn play(&self, cue: &str) {
        info!("Playing sound cue '{}'", cue);
        self.played.lock().push(cue.to_string());
    }

    fn stop(&self, cue: &str) {
        info!("Stopping sound cue '{}'", cue);
        self.stopped.lock().push(cue.to_string());
    }
}
