//! Ledger module containing balance books, the token state machine and its hosts

pub mod account;
pub mod core;
pub mod service;
pub mod shared;
pub mod transaction;

pub use account::*;
pub use self::core::*;
pub use service::*;
pub use shared::*;
pub use transaction::*;
