//! Quest Graph
//!
//! Prerequisite ordering between quests as a forest: every node has at most
//! one parent, and completing the parent's quest unlocks its children.
//! Nodes live in an arena and refer to their parent by index.

use std::fmt;

use serde::Serialize;

use super::state::QuestId;
use crate::error::QuestError;

/// Index of a node inside its graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestGraphNode {
    id: NodeId,
    quest_id: QuestId,
    /// Prerequisite node, not owned
    parent: Option<NodeId>,
}

impl QuestGraphNode {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn quest_id(&self) -> QuestId {
        self.quest_id
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Graph nodes in insertion order
#[derive(Debug, Clone, Default)]
pub struct QuestGraph {
    nodes: Vec<QuestGraphNode>,
}

impl QuestGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root node for a quest
    pub fn add_node(&mut self, quest_id: QuestId) -> Result<NodeId, QuestError> {
        if self.node_for_quest(quest_id).is_some() {
            return Err(QuestError::DuplicateGraphNode(quest_id));
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(QuestGraphNode {
            id,
            quest_id,
            parent: None,
        });
        Ok(id)
    }

    /// Add a node whose quest unlocks when `parent`'s quest completes
    pub fn add_child(&mut self, quest_id: QuestId, parent: NodeId) -> Result<NodeId, QuestError> {
        self.ensure_node(parent)?;
        let id = self.add_node(quest_id)?;
        self.nodes[id.0].parent = Some(parent);
        Ok(id)
    }

    /// Record a prerequisite edge, replacing any previous parent.
    ///
    /// Fails without changing the graph if the edge would create a cycle.
    pub fn set_parent(&mut self, child: NodeId, parent: NodeId) -> Result<(), QuestError> {
        self.ensure_node(child)?;
        self.ensure_node(parent)?;

        // Reaching the child while walking up from the new parent means a cycle
        if parent == child || self.ancestors(parent).contains(&child) {
            return Err(QuestError::GraphCycle { child, parent });
        }

        self.nodes[child.0].parent = Some(parent);
        Ok(())
    }

    fn ensure_node(&self, id: NodeId) -> Result<(), QuestError> {
        if id.0 >= self.nodes.len() {
            return Err(QuestError::UnknownNode(id));
        }
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> Option<&QuestGraphNode> {
        self.nodes.get(id.0)
    }

    pub fn node_for_quest(&self, quest_id: QuestId) -> Option<&QuestGraphNode> {
        self.nodes.iter().find(|n| n.quest_id == quest_id)
    }

    pub fn nodes(&self) -> &[QuestGraphNode] {
        &self.nodes
    }

    pub fn roots(&self) -> impl Iterator<Item = &QuestGraphNode> {
        self.nodes.iter().filter(|n| n.is_root())
    }

    pub fn children(&self, parent: NodeId) -> impl Iterator<Item = &QuestGraphNode> {
        self.nodes.iter().filter(move |n| n.parent == Some(parent))
    }

    /// Quests unlocked by completing `quest_id`, in insertion order
    pub fn unlocked_by(&self, quest_id: QuestId) -> Vec<QuestId> {
        match self.node_for_quest(quest_id) {
            Some(node) => self.children(node.id).map(|n| n.quest_id).collect(),
            None => Vec::new(),
        }
    }

    /// Quest whose completion unlocks `quest_id`, if it has one
    pub fn prerequisite_of(&self, quest_id: QuestId) -> Option<QuestId> {
        let parent = self.node_for_quest(quest_id)?.parent?;
        Some(self.nodes[parent.0].quest_id)
    }

    /// Parent chain of a node, nearest first
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut ancestors = Vec::new();
        let mut current = self.node(id).and_then(|n| n.parent);
        while let Some(node) = current {
            ancestors.push(node);
            current = self.nodes[node.0].parent;
        }
        ancestors
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(len: u32) -> (QuestGraph, Vec<NodeId>) {
        let mut graph = QuestGraph::new();
        let mut ids = vec![graph.add_node(QuestId(1)).unwrap()];
        for quest in 2..=len {
            let parent = *ids.last().unwrap();
            ids.push(graph.add_child(QuestId(quest), parent).unwrap());
        }
        (graph, ids)
    }

    #[test]
    fn test_chain_unlocks_next_quest() {
        let (graph, ids) = chain(4);

        assert_eq!(graph.roots().count(), 1);
        assert_eq!(graph.unlocked_by(QuestId(1)), vec![QuestId(2)]);
        assert_eq!(graph.unlocked_by(QuestId(4)), Vec::<QuestId>::new());
        assert_eq!(graph.prerequisite_of(QuestId(3)), Some(QuestId(2)));
        assert_eq!(graph.prerequisite_of(QuestId(1)), None);
        assert_eq!(graph.ancestors(ids[3]), vec![ids[2], ids[1], ids[0]]);
    }

    #[test]
    fn test_cycle_is_rejected() {
        let (mut graph, ids) = chain(3);

        assert_eq!(
            graph.set_parent(ids[0], ids[2]),
            Err(QuestError::GraphCycle { child: ids[0], parent: ids[2] })
        );
        assert!(graph.node(ids[0]).unwrap().is_root());
    }

    #[test]
    fn test_self_parent_is_rejected() {
        let mut graph = QuestGraph::new();
        let node = graph.add_node(QuestId(1)).unwrap();
        assert!(matches!(
            graph.set_parent(node, node),
            Err(QuestError::GraphCycle { .. })
        ));
    }

    #[test]
    fn test_reparenting_within_forest() {
        let mut graph = QuestGraph::new();
        let a = graph.add_node(QuestId(1)).unwrap();
        let b = graph.add_node(QuestId(2)).unwrap();
        let c = graph.add_child(QuestId(3), a).unwrap();

        graph.set_parent(c, b).unwrap();

        assert!(graph.unlocked_by(QuestId(1)).is_empty());
        assert_eq!(graph.unlocked_by(QuestId(2)), vec![QuestId(3)]);
    }

    #[test]
    fn test_siblings_unlock_in_insertion_order() {
        let mut graph = QuestGraph::new();
        let root = graph.add_node(QuestId(10)).unwrap();
        graph.add_child(QuestId(12), root).unwrap();
        graph.add_child(QuestId(11), root).unwrap();

        assert_eq!(graph.unlocked_by(QuestId(10)), vec![QuestId(12), QuestId(11)]);
    }

    #[test]
    fn test_unknown_and_duplicate_nodes() {
        let mut graph = QuestGraph::new();
        let root = graph.add_node(QuestId(1)).unwrap();

        assert_eq!(graph.add_node(QuestId(1)), Err(QuestError::DuplicateGraphNode(QuestId(1))));
        assert_eq!(
            graph.set_parent(root, NodeId(7)),
            Err(QuestError::UnknownNode(NodeId(7)))
        );
        assert_eq!(
            graph.add_child(QuestId(2), NodeId(3)),
            Err(QuestError::UnknownNode(NodeId(3)))
        );
        assert_eq!(graph.len(), 1);
    }
}
