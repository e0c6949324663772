//! Deployment configuration for a token ledger

use serde::{Deserialize, Serialize};

use crate::types::*;
use crate::utils::validation::{validate_account_id, validate_token_name, validate_token_symbol};

/// Constructor arguments supplied by the deployment layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Display name of the token
    pub name: String,
    /// Ticker symbol
    pub symbol: String,
    /// Scaling exponent between display and base units
    #[serde(default = "default_decimals")]
    pub decimals: u8,
    /// Initial supply in display units, credited to `owner`
    pub initial_supply: Amount,
    /// Identity deploying the ledger; the only one allowed to mint and burn
    pub owner: AccountId,
}

fn default_decimals() -> u8 {
    18
}

impl TokenConfig {
    /// Create a new configuration
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        decimals: u8,
        initial_supply: Amount,
        owner: AccountId,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals,
            initial_supply,
            owner,
        }
    }

    /// Check metadata and owner identity before a ledger is built from this config
    pub fn validate(&self) -> LedgerResult<()> {
        validate_token_name(&self.name)?;
        validate_token_symbol(&self.symbol)?;
        validate_account_id(self.owner.as_str())?;

        if self.owner.is_zero_address() {
            return Err(LedgerError::Validation(
                "Owner cannot be the zero address".to_string(),
            ));
        }

        Ok(())
    }

    pub fn metadata(&self) -> TokenMetadata {
        TokenMetadata::new(self.name.clone(), self.symbol.clone(), self.decimals)
    }
}
