//! Quest Handler
//!
//! Owns the quests of one level, the prerequisite graph and the player's
//! progression. Gameplay systems report events here; each event is routed
//! to the goals of every active quest and all resulting completions and
//! unlocks are resolved before the call returns.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use super::events::{EventOutcome, GameplayEvent};
use super::goal::{Goal, GoalId};
use super::graph::QuestGraph;
use super::observer::QuestObserver;
use super::state::{Quest, QuestId};
use crate::error::QuestError;
use crate::item::ItemType;
use crate::progression::PlayerProgression;

#[derive(Debug, Default)]
pub struct QuestHandler {
    /// Quests in registration order
    quests: Vec<Quest>,
    index: HashMap<QuestId, usize>,
    /// Which quest owns each goal
    goal_owners: HashMap<GoalId, QuestId>,
    graph: Option<QuestGraph>,
    progression: PlayerProgression,
}

impl QuestHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a handler that grants rewards to an existing player
    pub fn with_progression(progression: PlayerProgression) -> Self {
        Self {
            progression,
            ..Self::default()
        }
    }

    /// Register a quest together with its goals
    pub fn add_quest(&mut self, quest: Quest) -> Result<(), QuestError> {
        let quest_id = quest.id();
        if self.index.contains_key(&quest_id) {
            return Err(QuestError::DuplicateQuest(quest_id));
        }
        if let Some(goal) = quest
            .goals()
            .iter()
            .find(|g| self.goal_owners.contains_key(&g.id()))
        {
            return Err(QuestError::DuplicateGoal(goal.id()));
        }

        for goal in quest.goals() {
            self.goal_owners.insert(goal.id(), quest_id);
        }
        self.index.insert(quest_id, self.quests.len());
        debug!("Registered quest {} with {} goals", quest_id, quest.goals().len());
        self.quests.push(quest);
        Ok(())
    }

    /// Attach the activation topology.
    ///
    /// Roots become active, as does any node whose prerequisite is already
    /// completed; every other quest in the graph is deactivated.
    pub fn set_graph(&mut self, graph: QuestGraph) -> Result<(), QuestError> {
        if self.graph.is_some() {
            return Err(QuestError::GraphAlreadySet);
        }
        if let Some(node) = graph
            .nodes()
            .iter()
            .find(|n| !self.index.contains_key(&n.quest_id()))
        {
            return Err(QuestError::UnknownQuest(node.quest_id()));
        }

        for node in graph.nodes() {
            let unlocked = match graph.prerequisite_of(node.quest_id()) {
                None => true,
                Some(parent) => self.quest(parent).is_some_and(|q| q.is_completed()),
            };
            if let Some(quest) = self.quest_mut(node.quest_id()) {
                quest.set_active(unlocked);
            }
        }

        info!(
            "Quest graph attached: {} nodes, {} roots",
            graph.len(),
            graph.roots().count()
        );
        self.graph = Some(graph);
        Ok(())
    }

    pub fn graph(&self) -> Option<&QuestGraph> {
        self.graph.as_ref()
    }

    pub fn quest(&self, quest_id: QuestId) -> Option<&Quest> {
        self.index.get(&quest_id).map(|&i| &self.quests[i])
    }

    fn quest_mut(&mut self, quest_id: QuestId) -> Option<&mut Quest> {
        let i = *self.index.get(&quest_id)?;
        Some(&mut self.quests[i])
    }

    fn quest_mut_or_err(&mut self, quest_id: QuestId) -> Result<&mut Quest, QuestError> {
        self.quest_mut(quest_id)
            .ok_or(QuestError::UnknownQuest(quest_id))
    }

    /// All quests in registration order
    pub fn quests(&self) -> &[Quest] {
        &self.quests
    }

    pub fn active_quests(&self) -> impl Iterator<Item = &Quest> {
        self.quests.iter().filter(|q| q.is_active())
    }

    pub fn goal(&self, goal_id: GoalId) -> Option<&Goal> {
        let quest_id = self.goal_owners.get(&goal_id)?;
        self.quest(*quest_id)?.goal(goal_id)
    }

    /// Whether every registered quest is completed
    pub fn is_complete(&self) -> bool {
        !self.quests.is_empty() && self.quests.iter().all(|q| q.is_completed())
    }

    /// Manually toggle a quest's eligibility.
    ///
    /// Only quests outside the graph can be toggled; graph quests follow
    /// their prerequisites.
    pub fn set_quest_active(&mut self, quest_id: QuestId, active: bool) -> Result<bool, QuestError> {
        if self
            .graph
            .as_ref()
            .is_some_and(|graph| graph.node_for_quest(quest_id).is_some())
        {
            return Err(QuestError::QuestManagedByGraph(quest_id));
        }
        Ok(self.quest_mut_or_err(quest_id)?.set_active(active))
    }

    pub fn observe_quest(
        &mut self,
        quest_id: QuestId,
        observer: Arc<dyn QuestObserver>,
    ) -> Result<bool, QuestError> {
        Ok(self.quest_mut_or_err(quest_id)?.add_observer(observer))
    }

    pub fn observe_goal(
        &mut self,
        goal_id: GoalId,
        observer: Arc<dyn QuestObserver>,
    ) -> Result<bool, QuestError> {
        let quest_id = *self
            .goal_owners
            .get(&goal_id)
            .ok_or(QuestError::UnknownGoal(goal_id))?;
        self.quest_mut_or_err(quest_id)?
            .add_goal_observer(goal_id, observer)
    }

    /// Attach one observer to every quest and goal
    pub fn observe_all(&mut self, observer: Arc<dyn QuestObserver>) {
        for quest in &mut self.quests {
            quest.observe_all(Arc::clone(&observer));
        }
    }

    pub fn progression(&self) -> &PlayerProgression {
        &self.progression
    }

    /// Hand the player's progression back when the level is torn down
    pub fn into_progression(self) -> PlayerProgression {
        self.progression
    }

    /// An actor was killed
    pub fn kill(&mut self, target: &str) -> EventOutcome {
        self.handle(&GameplayEvent::killed(target))
    }

    /// An actor was eaten
    pub fn eaten(&mut self, target: &str) -> EventOutcome {
        self.handle(&GameplayEvent::eaten(target))
    }

    /// The player picked up `amount` items of a type
    pub fn collect(&mut self, item_type: ItemType, amount: u32) -> EventOutcome {
        self.handle(&GameplayEvent::collected(item_type, amount))
    }

    /// Deliver an event to the quests active right now, then unlock the
    /// children of every quest it completed.
    pub fn handle(&mut self, event: &GameplayEvent) -> EventOutcome {
        let mut outcome = EventOutcome::default();

        let active: Vec<usize> = (0..self.quests.len())
            .filter(|&i| self.quests[i].is_active())
            .collect();

        for i in active {
            let quest = &mut self.quests[i];
            let update = quest.handle_event(event, &mut self.progression);
            outcome.goals_progressed.extend(update.goals_progressed);
            outcome.goals_completed.extend(update.goals_completed);
            if update.completed {
                let quest_id = quest.id();
                outcome.quests_completed.push(quest_id);
                outcome
                    .rewards_granted
                    .extend(update.grants.into_iter().map(|g| (quest_id, g)));
            }
        }

        for quest_id in outcome.quests_completed.clone() {
            self.unlock_children(quest_id, &mut outcome);
        }

        if outcome.is_unchanged() {
            debug!("Event {} matched no active goal", event.event_type());
        } else {
            info!(
                "Event {}: {} goals progressed, {} completed, quests completed {:?}, activated {:?}",
                event.event_type(),
                outcome.goals_progressed.len(),
                outcome.goals_completed.len(),
                outcome.quests_completed,
                outcome.quests_activated
            );
        }

        outcome
    }

    fn unlock_children(&mut self, quest_id: QuestId, outcome: &mut EventOutcome) {
        let unlocked = match &self.graph {
            Some(graph) => graph.unlocked_by(quest_id),
            None => return,
        };

        for child in unlocked {
            if let Some(quest) = self.quest_mut(child) {
                if quest.set_active(true) {
                    outcome.quests_activated.push(child);
                }
            }
        }
    }
}
