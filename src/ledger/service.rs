//! Ledger host that persists committed state through a storage backend

use tracing::{debug, info, warn};

use crate::ledger::{SharedLedger, TokenCommand, TokenLedger};
use crate::traits::*;
use crate::types::*;

/// Main service that executes commands and records their results in storage
///
/// Events drained from the ledger stay buffered in the service until storage has
/// accepted them, so a failed write can be retried with [`TokenService::persist_pending`].
pub struct TokenService<S: TokenStorage> {
    ledger: SharedLedger,
    storage: S,
    unpersisted: Vec<TokenEvent>,
}

impl<S: TokenStorage> TokenService<S> {
    /// Host a freshly constructed ledger, persisting its genesis state
    pub async fn create(ledger: TokenLedger, storage: S) -> LedgerResult<Self> {
        let mut service = Self {
            ledger: SharedLedger::new(ledger),
            storage,
            unpersisted: Vec::new(),
        };
        service.persist_pending().await?;
        Ok(service)
    }

    /// Rebuild a service from the snapshot held by `storage`, if there is one
    pub async fn restore(storage: S) -> LedgerResult<Option<Self>> {
        let Some(snapshot) = storage.load_snapshot().await? else {
            return Ok(None);
        };

        let ledger = TokenLedger::from_snapshot(snapshot)?;
        info!(owner = %ledger.owner(), "token service restored");

        Ok(Some(Self {
            ledger: SharedLedger::new(ledger),
            storage,
            unpersisted: Vec::new(),
        }))
    }

    /// Handle to the hosted ledger for reads or direct concurrent use
    pub fn ledger(&self) -> &SharedLedger {
        &self.ledger
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Execute one command for `caller` and persist its events and resulting state
    ///
    /// A rejected command leaves both the ledger and the storage untouched. When the
    /// command commits but storage fails, the ledger keeps the new state and the
    /// events wait in the service for the next [`TokenService::persist_pending`].
    pub async fn execute(
        &mut self,
        caller: &AccountId,
        command: TokenCommand,
    ) -> LedgerResult<Vec<TokenEvent>> {
        let (events, snapshot) = self.ledger.commit(caller, &command)?;
        self.unpersisted.extend(events.iter().cloned());

        self.flush(&snapshot).await.inspect_err(|e| {
            warn!(command = command.name(), caller = %caller, error = %e, "command not persisted")
        })?;

        debug!(
            command = command.name(),
            caller = %caller,
            events = events.len(),
            "command persisted"
        );
        Ok(events)
    }

    /// Persist events emitted through direct [`SharedLedger`] calls, together with
    /// any left over from an earlier storage failure
    ///
    /// Returns the number of events written.
    pub async fn persist_pending(&mut self) -> LedgerResult<usize> {
        let events = self.ledger.take_events()?;
        let snapshot = self.ledger.snapshot()?;
        self.unpersisted.extend(events);

        self.flush(&snapshot).await
    }

    /// Events committed in memory but not yet accepted by storage
    pub fn unpersisted_events(&self) -> &[TokenEvent] {
        &self.unpersisted
    }

    async fn flush(&mut self, snapshot: &LedgerSnapshot) -> LedgerResult<usize> {
        let written = self.unpersisted.len();
        if written > 0 {
            self.storage.append_events(&self.unpersisted).await?;
            self.unpersisted.clear();
        }

        self.storage.save_snapshot(snapshot).await?;
        Ok(written)
    }

    /// Event history, optionally limited to one account
    pub async fn history(&self, account: Option<&AccountId>) -> LedgerResult<Vec<TokenEvent>> {
        match account {
            Some(account) => self.storage.get_account_events(account).await,
            None => self.storage.get_events().await,
        }
    }
}
