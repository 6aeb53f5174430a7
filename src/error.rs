//! Error Types
//!
//! Configuration errors are raised at call time and never leave the quest
//! state half-updated. Unmatched events and redundant progress are not
//! errors at all and never show up here.

use std::path::PathBuf;

use thiserror::Error;

use crate::quest::{GoalId, NodeId, QuestId, RewardId};

/// Errors raised while wiring quests, goals, rewards and the quest graph
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestError {
    /// Goals and rewards cannot be attached to a completed quest
    #[error("quest {0} is already completed")]
    QuestCompleted(QuestId),

    /// Goal configuration is frozen once progress has been made
    #[error("goal {0} already has progress and cannot be reconfigured")]
    GoalInProgress(GoalId),

    #[error("goal {0} needs a goal count of at least 1")]
    InvalidGoalCount(GoalId),

    #[error("quest {0} is already registered")]
    DuplicateQuest(QuestId),

    #[error("goal {0} is already registered")]
    DuplicateGoal(GoalId),

    #[error("reward {reward} is already attached to quest {quest}")]
    DuplicateReward { quest: QuestId, reward: RewardId },

    #[error("quest {0} is not registered")]
    UnknownQuest(QuestId),

    #[error("goal {0} is not registered")]
    UnknownGoal(GoalId),

    #[error("graph node {0} does not exist")]
    UnknownNode(NodeId),

    #[error("quest {0} already has a graph node")]
    DuplicateGraphNode(QuestId),

    /// Setting this parent would make a node its own ancestor
    #[error("making node {parent} the parent of node {child} creates a cycle")]
    GraphCycle { child: NodeId, parent: NodeId },

    #[error("a quest graph is already attached to this handler")]
    GraphAlreadySet,

    /// Graph quests are activated only by their prerequisites
    #[error("quest {0} is part of the quest graph and cannot be toggled manually")]
    QuestManagedByGraph(QuestId),
}

/// Errors raised while reading quest lines and level configuration from disk
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A definition parsed but does not describe a valid quest line
    #[error("invalid quest definition: {0}")]
    Definition(String),

    #[error(transparent)]
    Quest(#[from] QuestError),
}
