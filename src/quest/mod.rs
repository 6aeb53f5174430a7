//! Quest System Module
//!
//! Quests made of countable goals, unlocked along a prerequisite graph,
//! paying out rewards on completion and reporting every transition to
//! registered observers.

pub mod definition;
pub mod events;
pub mod goal;
pub mod graph;
pub mod handler;
pub mod observer;
pub mod registry;
pub mod reward;
pub mod shared;
pub mod state;

pub use definition::{GoalDefinition, QuestDefinition};
pub use events::{EventOutcome, GameplayEvent};
pub use goal::{Goal, GoalId, GoalKind, GoalUpdate};
pub use graph::{NodeId, QuestGraph, QuestGraphNode};
pub use handler::QuestHandler;
pub use observer::{ObserverList, QuestNotification, QuestObserver};
pub use registry::QuestRegistry;
pub use reward::{Reward, RewardGrant, RewardId};
pub use shared::SharedQuestHandler;
pub use state::{Quest, QuestId, QuestStatus, QuestUpdate};
