//! In-memory storage implementation for testing

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::traits::*;
use crate::types::*;

/// In-memory storage implementation for testing and development
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    snapshot: Arc<RwLock<Option<LedgerSnapshot>>>,
    events: Arc<RwLock<Vec<TokenEvent>>>,
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(None)),
            events: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) -> LedgerResult<()> {
        *self.snapshot.write().map_err(poisoned)? = None;
        self.events.write().map_err(poisoned)?.clear();
        Ok(())
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> LedgerError {
    LedgerError::Storage("memory storage lock poisoned".to_string())
}

#[async_trait]
impl TokenStorage for MemoryStorage {
    async fn save_snapshot(&mut self, snapshot: &LedgerSnapshot) -> LedgerResult<()> {
        *self.snapshot.write().map_err(poisoned)? = Some(snapshot.clone());
        Ok(())
    }

    async fn load_snapshot(&self) -> LedgerResult<Option<LedgerSnapshot>> {
        Ok(self.snapshot.read().map_err(poisoned)?.clone())
    }

    async fn append_events(&mut self, events: &[TokenEvent]) -> LedgerResult<()> {
        self.events
            .write()
            .map_err(poisoned)?
            .extend_from_slice(events);
        Ok(())
    }

    async fn get_events(&self) -> LedgerResult<Vec<TokenEvent>> {
        Ok(self.events.read().map_err(poisoned)?.clone())
    }

    async fn get_account_events(&self, account: &AccountId) -> LedgerResult<Vec<TokenEvent>> {
        let events = self.events.read().map_err(poisoned)?;
        let filtered: Vec<TokenEvent> = events
            .iter()
            .filter(|event| event.involves(account))
            .cloned()
            .collect();
        Ok(filtered)
    }
}
