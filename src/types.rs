//! Core types and data structures for the token ledger

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Stored token quantity, always in base units (already scaled by `10^decimals`)
pub type Amount = u128;

/// Opaque account identity
///
/// The ledger only relies on equality and ordering. Identities built with
/// [`AccountId::new`] are taken as-is; parsing through [`str::parse`] validates the
/// format and is what user-facing layers should use.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Wrap an identity without validating it
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the underlying identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is an all-zero address such as `0x0000...0000`
    pub fn is_zero_address(&self) -> bool {
        let digits = self.0.strip_prefix("0x").unwrap_or(&self.0);
        !digits.is_empty() && digits.chars().all(|c| c == '0')
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AccountId {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::utils::validation::validate_account_id(s)?;
        Ok(Self(s.to_string()))
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Immutable descriptive data fixed at construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// Display name, e.g. "Test Coin"
    pub name: String,
    /// Ticker symbol
    pub symbol: String,
    /// Scaling exponent between display units and base units
    pub decimals: u8,
}

impl TokenMetadata {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals,
        }
    }

    /// `10^decimals`, failing closed when it does not fit an [`Amount`]
    pub fn scale_factor(&self) -> LedgerResult<Amount> {
        Amount::from(10u8)
            .checked_pow(u32::from(self.decimals))
            .ok_or(LedgerError::Overflow("decimal scale factor"))
    }
}

/// What a state change notified observers about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenEventKind {
    /// Balance moved between two accounts, directly or via allowance
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: Amount,
    },
    /// Allowance overwritten
    Approval {
        owner: AccountId,
        spender: AccountId,
        amount: Amount,
    },
    /// New supply credited to an account
    Mint { to: AccountId, amount: Amount },
    /// Supply destroyed from an account
    Burn { from: AccountId, amount: Amount },
}

/// A notification emitted by a committed operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenEvent {
    /// Unique identifier for the event
    pub id: Uuid,
    /// Identity that invoked the operation
    pub caller: AccountId,
    /// What happened
    pub kind: TokenEventKind,
    /// When the operation was committed
    pub recorded_at: NaiveDateTime,
}

impl TokenEvent {
    /// Create a new event stamped with the current time
    pub fn new(caller: AccountId, kind: TokenEventKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            caller,
            kind,
            recorded_at: chrono::Utc::now().naive_utc(),
        }
    }

    /// Whether the event moved or granted value involving `account`
    pub fn involves(&self, account: &AccountId) -> bool {
        match &self.kind {
            TokenEventKind::Transfer { from, to, .. } => from == account || to == account,
            TokenEventKind::Approval { owner, spender, .. } => {
                owner == account || spender == account
            }
            TokenEventKind::Mint { to, .. } => to == account,
            TokenEventKind::Burn { from, .. } => from == account,
        }
    }
}

/// Operation whose balance precondition failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BalanceOperation {
    Transfer,
    Burn,
}

impl fmt::Display for BalanceOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BalanceOperation::Transfer => f.write_str("transfer"),
            BalanceOperation::Burn => f.write_str("burn"),
        }
    }
}

/// Errors that can occur in the ledger system
///
/// Messages are matched by substring in compatibility tests and must stay stable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("Account doesn't have enough money to {0}")]
    InsufficientBalance(BalanceOperation),
    #[error("Money transfer limit exceeded")]
    AllowanceExceeded,
    #[error("Caller is not the owner: only the owner of the contract can perform this operation")]
    NotOwner,
    #[error("Arithmetic overflow while computing {0}")]
    Overflow(&'static str),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
