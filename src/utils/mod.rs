//! Utility modules

pub mod memory_storage;
pub mod units;
pub mod validation;

pub use memory_storage::*;
pub use units::*;
pub use validation::*;
