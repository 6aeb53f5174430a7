//! Level Configuration
//!
//! Per-level settings read from `<data>/level.toml`: starting player
//! progression, sound cue names, the log filter, and a scripted sequence
//! of gameplay events for headless runs.

use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::audio::SoundCues;
use crate::error::LoadError;
use crate::progression::{DEFAULT_LEVEL_THRESHOLD, PlayerProgression};
use crate::quest::GameplayEvent;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub exp: u64,
    pub level: u32,
    pub level_threshold: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            exp: 0,
            level: 0,
            level_threshold: DEFAULT_LEVEL_THRESHOLD,
        }
    }
}

impl PlayerConfig {
    pub fn progression(&self) -> PlayerProgression {
        PlayerProgression::new(self.exp, self.level, self.level_threshold)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub name: String,
    /// Extra `tracing` filter directive, e.g. "questline=debug"
    pub log_filter: Option<String>,
    pub player: PlayerConfig,
    pub sounds: SoundCues,
    /// Gameplay events replayed in order by the demo
    pub events: Vec<GameplayEvent>,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            name: "level".to_string(),
            log_filter: None,
            player: PlayerConfig::default(),
            sounds: SoundCues::default(),
            events: Vec::new(),
        }
    }
}

impl LevelConfig {
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, LoadError> {
        toml::from_str(content).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read `<data_dir>/level.toml`, falling back to defaults if it is missing
    pub fn load_from_directory(data_dir: &Path) -> Result<Self, LoadError> {
        let path = data_dir.join("level.toml");
        if !path.exists() {
            warn!("Level config does not exist: {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        Self::from_toml(&content, &path)
    }
}
