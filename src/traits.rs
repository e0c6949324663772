//! Traits for storage abstraction and extensibility

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::*;

/// Storage abstraction for persisting ledger state and its event history
///
/// The ledger itself is an in-memory state machine; implementations of this trait
/// let a host keep committed state (SQL, key-value, in-memory, etc.) between runs.
#[async_trait]
pub trait TokenStorage: Send + Sync {
    /// Replace the stored snapshot with `snapshot`
    async fn save_snapshot(&mut self, snapshot: &LedgerSnapshot) -> LedgerResult<()>;

    /// Load the most recently saved snapshot, if any
    async fn load_snapshot(&self) -> LedgerResult<Option<LedgerSnapshot>>;

    /// Append committed events in order
    async fn append_events(&mut self, events: &[TokenEvent]) -> LedgerResult<()>;

    /// List all events in commit order
    async fn get_events(&self) -> LedgerResult<Vec<TokenEvent>>;

    /// List events that touch a specific account
    async fn get_account_events(&self, account: &AccountId) -> LedgerResult<Vec<TokenEvent>>;
}

/// Trait for implementing custom account validation rules
pub trait AccountValidator: Send + Sync {
    /// Validate an account that is about to receive tokens
    fn validate_recipient(&self, account: &AccountId) -> LedgerResult<()>;

    /// Validate an account that is about to be granted an allowance
    fn validate_spender(&self, account: &AccountId) -> LedgerResult<()>;
}

/// Default account validator: any identity is acceptable
pub struct DefaultAccountValidator;

impl AccountValidator for DefaultAccountValidator {
    fn validate_recipient(&self, _account: &AccountId) -> LedgerResult<()> {
        Ok(())
    }

    fn validate_spender(&self, _account: &AccountId) -> LedgerResult<()> {
        Ok(())
    }
}

/// One stored allowance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceEntry {
    pub owner: AccountId,
    pub spender: AccountId,
    pub amount: Amount,
}

/// Complete, serializable copy of the ledger state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub metadata: TokenMetadata,
    pub owner: AccountId,
    pub total_supply: Amount,
    /// Non-zero balances keyed by account
    pub balances: BTreeMap<AccountId, Amount>,
    /// Non-zero allowances ordered by (owner, spender)
    pub allowances: Vec<AllowanceEntry>,
}

/// Report on ledger integrity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub is_valid: bool,
    pub issues: Vec<String>,
    pub total_supply: Amount,
    /// `None` when the balances cannot be summed without overflow
    pub sum_of_balances: Option<Amount>,
    pub holder_count: usize,
    pub allowance_count: usize,
}
