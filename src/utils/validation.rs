//! Validation utilities

use crate::traits::*;
use crate::types::*;

/// Validate that an account identifier is well formed
pub fn validate_account_id(account_id: &str) -> LedgerResult<()> {
    if account_id.trim().is_empty() {
        return Err(LedgerError::Validation(
            "Account ID cannot be empty".to_string(),
        ));
    }

    if account_id.len() > 64 {
        return Err(LedgerError::Validation(
            "Account ID cannot exceed 64 characters".to_string(),
        ));
    }

    // Hex addresses ("0xabc...") and symbolic names both fit this alphabet
    if !account_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(LedgerError::Validation(
            "Account ID can only contain alphanumeric characters, dashes, and underscores"
                .to_string(),
        ));
    }

    Ok(())
}

/// Validate that a token name is valid
pub fn validate_token_name(name: &str) -> LedgerResult<()> {
    if name.trim().is_empty() {
        return Err(LedgerError::Validation(
            "Token name cannot be empty".to_string(),
        ));
    }

    if name.len() > 100 {
        return Err(LedgerError::Validation(
            "Token name cannot exceed 100 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate that a token symbol is valid
pub fn validate_token_symbol(symbol: &str) -> LedgerResult<()> {
    if symbol.trim().is_empty() {
        return Err(LedgerError::Validation(
            "Token symbol cannot be empty".to_string(),
        ));
    }

    if symbol.len() > 32 {
        return Err(LedgerError::Validation(
            "Token symbol cannot exceed 32 characters".to_string(),
        ));
    }

    Ok(())
}

/// Strict account validator for hosts that receive identities from untrusted input
///
/// Rejects malformed identifiers and refuses to credit or authorize the zero
/// address, where tokens would be unrecoverable.
pub struct StrictAccountValidator;

impl StrictAccountValidator {
    fn check(&self, account: &AccountId, role: &str) -> LedgerResult<()> {
        validate_account_id(account.as_str())?;

        if account.is_zero_address() {
            return Err(LedgerError::Validation(format!(
                "The zero address cannot be used as a {}",
                role
            )));
        }

        Ok(())
    }
}

impl AccountValidator for StrictAccountValidator {
    fn validate_recipient(&self, account: &AccountId) -> LedgerResult<()> {
        self.check(account, "recipient")
    }

    fn validate_spender(&self, account: &AccountId) -> LedgerResult<()> {
        self.check(account, "spender")
    }
}
