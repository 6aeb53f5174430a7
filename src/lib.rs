//! Quest tracking for a single-threaded game loop.
//!
//! Gameplay systems report kills, meals and pickups to a `QuestHandler`,
//! which advances the goals of active quests, completes quests, grants
//! their rewards and unlocks follow-up quests along a prerequisite graph.
//! Every transition is reported to registered observers such as the
//! `SoundObserver` and the `QuestJournal`.

pub mod audio;
pub mod config;
pub mod error;
pub mod item;
pub mod journal;
pub mod progression;
pub mod quest;

pub use audio::{LoggingSoundBackend, SoundBackend, SoundCues, SoundObserver};
pub use config::LevelConfig;
pub use error::{LoadError, QuestError};
pub use item::{Item, ItemType};
pub use journal::QuestJournal;
pub use progression::PlayerProgression;
pub use quest::{
    EventOutcome, GameplayEvent, Goal, GoalId, Quest, QuestGraph, QuestHandler, QuestId,
    QuestNotification, QuestObserver, QuestRegistry, Reward, RewardId,
};
