//! Thread-safe handle serializing access to a single ledger

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::ledger::{TokenCommand, TokenLedger};
use crate::traits::*;
use crate::types::*;

/// Shared ledger for concurrent hosts
///
/// Mutations hold the write lock for the whole operation; reads hold the read
/// lock, so no caller ever observes a partially applied operation.
#[derive(Debug, Clone)]
pub struct SharedLedger {
    inner: Arc<RwLock<TokenLedger>>,
}

fn poisoned<T>(_: PoisonError<T>) -> LedgerError {
    LedgerError::Storage("ledger lock poisoned".to_string())
}

impl SharedLedger {
    pub fn new(ledger: TokenLedger) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    fn read(&self) -> LedgerResult<RwLockReadGuard<'_, TokenLedger>> {
        self.inner.read().map_err(poisoned)
    }

    fn write(&self) -> LedgerResult<RwLockWriteGuard<'_, TokenLedger>> {
        self.inner.write().map_err(poisoned)
    }

    /// Run a read-only closure against a consistent view of the ledger
    pub fn with_ledger<R>(&self, f: impl FnOnce(&TokenLedger) -> R) -> LedgerResult<R> {
        Ok(f(&*self.read()?))
    }

    pub fn balance_of(&self, account: &AccountId) -> LedgerResult<Amount> {
        Ok(self.read()?.balance_of(account))
    }

    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> LedgerResult<Amount> {
        Ok(self.read()?.allowance(owner, spender))
    }

    pub fn total_supply(&self) -> LedgerResult<Amount> {
        Ok(self.read()?.total_supply())
    }

    pub fn metadata(&self) -> LedgerResult<TokenMetadata> {
        Ok(self.read()?.metadata().clone())
    }

    pub fn owner(&self) -> LedgerResult<AccountId> {
        Ok(self.read()?.owner().clone())
    }

    pub fn transfer(&self, caller: &AccountId, to: &AccountId, amount: Amount) -> LedgerResult<()> {
        self.write()?.transfer(caller, to, amount)
    }

    pub fn approve(
        &self,
        caller: &AccountId,
        spender: &AccountId,
        amount: Amount,
    ) -> LedgerResult<()> {
        self.write()?.approve(caller, spender, amount)
    }

    pub fn transfer_from(
        &self,
        caller: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> LedgerResult<()> {
        self.write()?.transfer_from(caller, from, to, amount)
    }

    pub fn mint(&self, caller: &AccountId, to: &AccountId, amount: Amount) -> LedgerResult<()> {
        self.write()?.mint(caller, to, amount)
    }

    pub fn burn(&self, caller: &AccountId, from: &AccountId, amount: Amount) -> LedgerResult<()> {
        self.write()?.burn(caller, from, amount)
    }

    /// Apply `command` and capture the emitted events with the resulting state
    ///
    /// Everything happens under one write lock, so the snapshot reflects exactly
    /// this command's effects on top of the previous state.
    pub fn commit(
        &self,
        caller: &AccountId,
        command: &TokenCommand,
    ) -> LedgerResult<(Vec<TokenEvent>, LedgerSnapshot)> {
        let mut ledger = self.write()?;
        command.apply(&mut ledger, caller)?;
        Ok((ledger.take_events(), ledger.snapshot()))
    }

    /// Drain pending events
    pub fn take_events(&self) -> LedgerResult<Vec<TokenEvent>> {
        Ok(self.write()?.take_events())
    }

    pub fn snapshot(&self) -> LedgerResult<LedgerSnapshot> {
        Ok(self.read()?.snapshot())
    }

    pub fn validate_integrity(&self) -> LedgerResult<IntegrityReport> {
        Ok(self.read()?.validate_integrity())
    }
}
