//! Commands that apply exactly one ledger operation

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::ledger::TokenLedger;
use crate::types::*;
use crate::utils::units::AmountScale;

/// A single mutating operation with its typed arguments
///
/// The caller identity is supplied separately by whoever executes the command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenCommand {
    Transfer {
        to: AccountId,
        amount: Amount,
    },
    Approve {
        spender: AccountId,
        amount: Amount,
    },
    TransferFrom {
        from: AccountId,
        to: AccountId,
        amount: Amount,
    },
    Mint {
        to: AccountId,
        amount: Amount,
    },
    Burn {
        from: AccountId,
        amount: Amount,
    },
}

impl TokenCommand {
    /// Task name used on the command line
    pub fn name(&self) -> &'static str {
        match self {
            TokenCommand::Transfer { .. } => "transfer",
            TokenCommand::Approve { .. } => "approve",
            TokenCommand::TransferFrom { .. } => "transfer-from",
            TokenCommand::Mint { .. } => "mint",
            TokenCommand::Burn { .. } => "burn",
        }
    }

    /// Apply the command to `ledger` on behalf of `caller`
    pub fn apply(&self, ledger: &mut TokenLedger, caller: &AccountId) -> LedgerResult<()> {
        match self {
            TokenCommand::Transfer { to, amount } => ledger.transfer(caller, to, *amount),
            TokenCommand::Approve { spender, amount } => ledger.approve(caller, spender, *amount),
            TokenCommand::TransferFrom { from, to, amount } => {
                ledger.transfer_from(caller, from, to, *amount)
            }
            TokenCommand::Mint { to, amount } => ledger.mint(caller, to, *amount),
            TokenCommand::Burn { from, amount } => ledger.burn(caller, from, *amount),
        }
    }

    /// Resolve a named task and its string parameters into a typed command
    ///
    /// | task            | parameters            |
    /// |-----------------|-----------------------|
    /// | `transfer`      | `to`, `value`         |
    /// | `approve`       | `spender`, `amount`   |
    /// | `transfer-from` | `from`, `to`, `value` |
    /// | `mint`          | `to`, `amount`        |
    /// | `burn`          | `from`, `amount`      |
    pub fn from_task(
        task: &str,
        params: &HashMap<String, String>,
        scale: AmountScale,
    ) -> LedgerResult<Self> {
        let amount = |key: &str| required(params, key).and_then(|value| scale.resolve(value));

        match task {
            "transfer" => Ok(TokenCommand::Transfer {
                to: account(params, "to")?,
                amount: amount("value")?,
            }),
            "approve" => Ok(TokenCommand::Approve {
                spender: account(params, "spender")?,
                amount: amount("amount")?,
            }),
            "transfer-from" => Ok(TokenCommand::TransferFrom {
                from: account(params, "from")?,
                to: account(params, "to")?,
                amount: amount("value")?,
            }),
            "mint" => Ok(TokenCommand::Mint {
                to: account(params, "to")?,
                amount: amount("amount")?,
            }),
            "burn" => Ok(TokenCommand::Burn {
                from: account(params, "from")?,
                amount: amount("amount")?,
            }),
            other => Err(LedgerError::Validation(format!("Unknown task '{}'", other))),
        }
    }
}

fn required<'a>(params: &'a HashMap<String, String>, key: &str) -> LedgerResult<&'a str> {
    params
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| LedgerError::Validation(format!("Missing parameter '{}'", key)))
}

fn account(params: &HashMap<String, String>, key: &str) -> LedgerResult<AccountId> {
    required(params, key)?.parse()
}
