//! Shared Quest Handler
//!
//! For hosts that report gameplay events from more than one thread. The
//! whole intake-to-notification chain of one event runs under a single
//! lock, so completions and unlocks are still resolved as one unit.

use std::sync::Arc;

use parking_lot::Mutex;

use super::events::{EventOutcome, GameplayEvent};
use super::handler::QuestHandler;
use crate::item::ItemType;

#[derive(Debug, Clone)]
pub struct SharedQuestHandler {
    inner: Arc<Mutex<QuestHandler>>,
}

impl SharedQuestHandler {
    pub fn new(handler: QuestHandler) -> Self {
        Self {
            inner: Arc::new(Mutex::new(handler)),
        }
    }

    pub fn handle(&self, event: &GameplayEvent) -> EventOutcome {
        self.inner.lock().handle(event)
    }

    pub fn kill(&self, target: &str) -> EventOutcome {
        self.inner.lock().kill(target)
    }

    pub fn eaten(&self, target: &str) -> EventOutcome {
        self.inner.lock().eaten(target)
    }

    pub fn collect(&self, item_type: ItemType, amount: u32) -> EventOutcome {
        self.inner.lock().collect(item_type, amount)
    }

    /// Run a closure with exclusive access to the handler
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut QuestHandler) -> R,
    {
        f(&mut self.inner.lock())
    }
}
