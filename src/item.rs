use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Item Types
// ============================================================================

/// Classification tag used by collect goals and item rewards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Cookie,
    Branch,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Cookie => "cookie",
            ItemType::Branch => "branch",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cookie" => Some(ItemType::Cookie),
            "branch" => Some(ItemType::Branch),
            _ => None,
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Items
// ============================================================================

/// A concrete item that can be granted to the player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub name: String,
    pub item_type: ItemType,
}

impl Item {
    pub fn new(id: u32, name: impl Into<String>, item_type: ItemType) -> Self {
        Self {
            id,
            name: name.into(),
            item_type,
        }
    }
}
