//! Quest Registry
//!
//! Loads quest-line definitions from TOML files and instantiates a fresh
//! `QuestHandler` (quests plus prerequisite graph) for each level.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use super::definition::{QuestDefinition, resolve_quest_file};
use super::graph::QuestGraph;
use super::handler::QuestHandler;
use super::observer::QuestObserver;
use crate::error::LoadError;
use crate::progression::PlayerProgression;

/// Registry for all quest definitions
#[derive(Debug, Clone, Default)]
pub struct QuestRegistry {
    /// Definitions in load order (sorted file path, then file order)
    definitions: Vec<QuestDefinition>,
}

impl QuestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `*.toml` file below `<data_dir>/quests`
    pub fn load_from_directory(&mut self, data_dir: &Path) -> Result<usize, LoadError> {
        let quests_dir = data_dir.join("quests");
        info!("Loading quests from {:?}", quests_dir);

        if !quests_dir.exists() {
            warn!("Quest directory does not exist: {:?}", quests_dir);
            return Ok(0);
        }

        let mut paths = Vec::new();
        collect_toml_files(&quests_dir, &mut paths)?;
        paths.sort();

        // Stage every file so a failure leaves the registry untouched
        let mut staged = self.definitions.clone();
        for path in paths {
            staged.extend(read_quest_file(&path)?);
        }
        validate_chains(&staged)?;

        let count = staged.len() - self.definitions.len();
        self.definitions = staged;
        info!("Loaded {} quest definitions", count);
        Ok(count)
    }

    /// Load a single quest-line file
    pub fn load_quest_file(&mut self, path: &Path) -> Result<(), LoadError> {
        let quests = read_quest_file(path)?;
        self.definitions.extend(quests);
        Ok(())
    }

    pub fn definitions(&self) -> &[QuestDefinition] {
        &self.definitions
    }

    /// Quests without prerequisites (graph roots and standalone quests)
    pub fn starting_quests(&self) -> impl Iterator<Item = &QuestDefinition> {
        self.definitions.iter().filter(|q| q.previous.is_none())
    }

    pub fn count(&self) -> usize {
        self.definitions.len()
    }

    /// Build a handler with fresh quests, the prerequisite graph, and
    /// standalone quests already active.
    ///
    /// `observers` are attached to every quest and goal before anything
    /// activates, so they also see the initial activations.
    pub fn instantiate(
        &self,
        progression: PlayerProgression,
        observers: &[Arc<dyn QuestObserver>],
    ) -> Result<QuestHandler, LoadError> {
        validate_chains(&self.definitions)?;

        let mut handler = QuestHandler::with_progression(progression);
        for definition in &self.definitions {
            handler.add_quest(definition.build()?)?;
        }
        for observer in observers {
            handler.observe_all(Arc::clone(observer));
        }

        let mut graph = QuestGraph::new();
        let mut nodes = HashMap::new();
        for definition in self.definitions.iter().filter(|q| !q.standalone) {
            nodes.insert(definition.id, graph.add_node(definition.id)?);
        }
        for definition in &self.definitions {
            if let Some(previous) = definition.previous {
                // Both ids are graph members after validate_chains
                if let (Some(&child), Some(&parent)) =
                    (nodes.get(&definition.id), nodes.get(&previous))
                {
                    graph.set_parent(child, parent)?;
                }
            }
        }
        if !graph.is_empty() {
            handler.set_graph(graph)?;
        }

        for definition in self.definitions.iter().filter(|q| q.standalone) {
            handler.set_quest_active(definition.id, true)?;
        }

        Ok(handler)
    }
}

fn read_quest_file(path: &Path) -> Result<Vec<QuestDefinition>, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let quests = resolve_quest_file(&content, path)?;
    for quest in &quests {
        info!(
            "Loaded quest {} ({})",
            quest.id,
            quest.name.as_deref().unwrap_or("unnamed")
        );
    }
    Ok(quests)
}

/// Every `previous` must name a loaded quest that is part of the graph
fn validate_chains(definitions: &[QuestDefinition]) -> Result<(), LoadError> {
    for quest in definitions {
        let Some(previous) = quest.previous else {
            continue;
        };
        match definitions.iter().find(|q| q.id == previous) {
            None => {
                return Err(LoadError::Definition(format!(
                    "quest {} references non-existent previous quest {}",
                    quest.id, previous
                )));
            }
            Some(prev) if prev.standalone => {
                return Err(LoadError::Definition(format!(
                    "quest {} follows standalone quest {}",
                    quest.id, previous
                )));
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// Recursively collect TOML files below a directory
fn collect_toml_files(dir: &Path, paths: &mut Vec<PathBuf>) -> Result<(), LoadError> {
    let io_err = |source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };

    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_dir() {
            collect_toml_files(&path, paths)?;
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            paths.push(path);
        }
    }

    Ok(())
}
