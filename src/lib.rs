//! # Token Ledger
//!
//! A fungible token accounting engine: balances, delegated spending through
//! allowances, and owner-gated minting and burning, with strict numeric invariants.
//!
//! ## Features
//!
//! - **ERC20-style operations**: `transfer`, `approve`, `transfer_from`, `mint`, `burn`
//! - **All-or-nothing semantics**: a rejected operation never mutates state
//! - **Checked arithmetic**: overflow is an error, never a wraparound
//! - **Concurrency**: [`SharedLedger`] serializes mutations behind a single lock
//! - **Storage abstraction**: persist snapshots and events through [`TokenStorage`]
//! - **Command layer**: resolve named tasks with human-entered amounts into operations
//!
//! ## Quick Start
//!
//! ```rust
//! use token_ledger::{AccountId, LedgerError, TokenLedger};
//!
//! let owner = AccountId::new("owner");
//! let bob = AccountId::new("bob");
//! let mut ledger = TokenLedger::new(owner.clone(), "Test Coin", "TC", 2, 100).unwrap();
//!
//! ledger.transfer(&owner, &bob, 100).unwrap();
//! assert_eq!(ledger.balance_of(&owner), 9_900);
//! assert_eq!(ledger.mint(&bob, &bob, 1), Err(LedgerError::NotOwner));
//! ```

pub mod config;
pub mod ledger;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use ledger::*;
pub use traits::*;
pub use types::*;
