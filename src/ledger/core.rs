//! Token ledger state machine
//!
//! Every public mutation either commits completely or returns an error without
//! touching balances, allowances or supply. New values are computed with checked
//! arithmetic before anything is written.

use std::fmt;
use tracing::{debug, info, warn};

use crate::config::TokenConfig;
use crate::ledger::{AllowanceBook, BalanceBook};
use crate::traits::*;
use crate::types::*;

/// Fungible token ledger holding balances, allowances and supply
///
/// Each committed operation appends a [`TokenEvent`] to an internal buffer that only
/// [`TokenLedger::take_events`] empties. Callers driving the ledger directly must
/// drain it periodically; [`crate::ledger::TokenService`] does so on every command.
pub struct TokenLedger {
    metadata: TokenMetadata,
    owner: AccountId,
    total_supply: Amount,
    balances: BalanceBook,
    allowances: AllowanceBook,
    validator: Box<dyn AccountValidator>,
    pending_events: Vec<TokenEvent>,
}

impl TokenLedger {
    /// Create a ledger and credit `initial_supply * 10^decimals` to `owner`
    ///
    /// Fails only if the scaled supply overflows, in which case no ledger is built.
    pub fn new(
        owner: AccountId,
        name: impl Into<String>,
        symbol: impl Into<String>,
        decimals: u8,
        initial_supply: Amount,
    ) -> LedgerResult<Self> {
        let metadata = TokenMetadata::new(name, symbol, decimals);
        let total_supply = initial_supply
            .checked_mul(metadata.scale_factor()?)
            .ok_or(LedgerError::Overflow("initial supply"))?;

        let mut balances = BalanceBook::new();
        balances.set(&owner, total_supply);

        info!(
            owner = %owner,
            symbol = %metadata.symbol,
            decimals = metadata.decimals,
            total_supply = %total_supply,
            "token ledger created"
        );

        let genesis = TokenEvent::new(
            owner.clone(),
            TokenEventKind::Mint {
                to: owner.clone(),
                amount: total_supply,
            },
        );

        Ok(Self {
            metadata,
            owner,
            total_supply,
            balances,
            allowances: AllowanceBook::new(),
            validator: Box::new(DefaultAccountValidator),
            pending_events: vec![genesis],
        })
    }

    /// Validate a deployment configuration and build the ledger it describes
    pub fn from_config(config: &TokenConfig) -> LedgerResult<Self> {
        config.validate()?;
        Self::new(
            config.owner.clone(),
            config.name.clone(),
            config.symbol.clone(),
            config.decimals,
            config.initial_supply,
        )
    }

    /// Rebuild a ledger from a snapshot, refusing one whose balances do not add up
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> LedgerResult<Self> {
        let balances = BalanceBook::from_map(snapshot.balances);
        match balances.checked_sum() {
            Some(sum) if sum == snapshot.total_supply => {}
            Some(sum) => {
                return Err(LedgerError::Validation(format!(
                    "Snapshot is inconsistent: total supply = {}, sum of balances = {}",
                    snapshot.total_supply, sum
                )));
            }
            None => {
                return Err(LedgerError::Validation(
                    "Snapshot is inconsistent: balances overflow the supply type".to_string(),
                ));
            }
        }

        info!(
            owner = %snapshot.owner,
            total_supply = %snapshot.total_supply,
            holders = balances.len(),
            "token ledger restored from snapshot"
        );

        Ok(Self {
            metadata: snapshot.metadata,
            owner: snapshot.owner,
            total_supply: snapshot.total_supply,
            balances,
            allowances: AllowanceBook::from_entries(snapshot.allowances),
            validator: Box::new(DefaultAccountValidator),
            pending_events: Vec::new(),
        })
    }

    /// Replace the account validator applied to recipients and spenders
    pub fn with_validator(mut self, validator: Box<dyn AccountValidator>) -> Self {
        self.validator = validator;
        self
    }

    // Read operations

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.metadata.decimals
    }

    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    /// Identity allowed to mint and burn
    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Balance of `account`, zero for unknown accounts
    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.balances.balance_of(account)
    }

    /// Remaining amount `spender` may transfer out of `owner`'s balance
    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> Amount {
        self.allowances.allowance(owner, spender)
    }

    /// Accounts with a non-zero balance, in identity order
    pub fn holders(&self) -> Vec<(AccountId, Amount)> {
        self.balances
            .holders()
            .map(|(account, amount)| (account.clone(), amount))
            .collect()
    }

    // Mutating operations

    /// Move `amount` from `caller` to `to`
    ///
    /// Buffers a Transfer event until [`TokenLedger::take_events`] drains it.
    pub fn transfer(
        &mut self,
        caller: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> LedgerResult<()> {
        self.try_transfer(caller, to, amount).inspect_err(|e| {
            warn!(caller = %caller, to = %to, amount = %amount, error = %e, "transfer rejected")
        })?;

        debug!(caller = %caller, to = %to, amount = %amount, "transfer committed");
        self.emit(
            caller,
            TokenEventKind::Transfer {
                from: caller.clone(),
                to: to.clone(),
                amount,
            },
        );
        Ok(())
    }

    fn try_transfer(&mut self, caller: &AccountId, to: &AccountId, amount: Amount) -> LedgerResult<()> {
        self.validator.validate_recipient(to)?;
        self.move_balance(caller, to, amount)
    }

    /// Set the allowance `spender` may draw from `caller`, replacing any prior value
    ///
    /// Buffers an Approval event until [`TokenLedger::take_events`] drains it.
    pub fn approve(
        &mut self,
        caller: &AccountId,
        spender: &AccountId,
        amount: Amount,
    ) -> LedgerResult<()> {
        self.validator.validate_spender(spender).inspect_err(|e| {
            warn!(caller = %caller, spender = %spender, error = %e, "approve rejected")
        })?;

        self.allowances.set(caller, spender, amount);

        debug!(caller = %caller, spender = %spender, amount = %amount, "allowance set");
        self.emit(
            caller,
            TokenEventKind::Approval {
                owner: caller.clone(),
                spender: spender.clone(),
                amount,
            },
        );
        Ok(())
    }

    /// Move `amount` from `from` to `to`, consuming the allowance `from` granted `caller`
    ///
    /// Buffers a Transfer event until [`TokenLedger::take_events`] drains it.
    ///
    /// The allowance is checked before the balance, so a call that violates both
    /// reports [`LedgerError::AllowanceExceeded`].
    pub fn transfer_from(
        &mut self,
        caller: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> LedgerResult<()> {
        self.try_transfer_from(caller, from, to, amount)
            .inspect_err(|e| {
                warn!(caller = %caller, from = %from, to = %to, amount = %amount, error = %e, "transfer_from rejected")
            })?;

        debug!(caller = %caller, from = %from, to = %to, amount = %amount, "transfer_from committed");
        self.emit(
            caller,
            TokenEventKind::Transfer {
                from: from.clone(),
                to: to.clone(),
                amount,
            },
        );
        Ok(())
    }

    fn try_transfer_from(
        &mut self,
        caller: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> LedgerResult<()> {
        self.validator.validate_recipient(to)?;

        let remaining = self
            .allowances
            .allowance(from, caller)
            .checked_sub(amount)
            .ok_or(LedgerError::AllowanceExceeded)?;

        // move_balance writes nothing on failure, so the allowance is consumed last
        self.move_balance(from, to, amount)?;
        self.allowances.set(from, caller, remaining);
        Ok(())
    }

    /// Create `amount` new tokens in `to`'s balance (owner only)
    ///
    /// Buffers a Mint event until [`TokenLedger::take_events`] drains it.
    pub fn mint(&mut self, caller: &AccountId, to: &AccountId, amount: Amount) -> LedgerResult<()> {
        self.try_mint(caller, to, amount).inspect_err(|e| {
            warn!(caller = %caller, to = %to, amount = %amount, error = %e, "mint rejected")
        })?;

        debug!(to = %to, amount = %amount, total_supply = %self.total_supply, "mint committed");
        self.emit(
            caller,
            TokenEventKind::Mint {
                to: to.clone(),
                amount,
            },
        );
        Ok(())
    }

    fn try_mint(&mut self, caller: &AccountId, to: &AccountId, amount: Amount) -> LedgerResult<()> {
        self.ensure_owner(caller)?;
        self.validator.validate_recipient(to)?;

        let new_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::Overflow("total supply"))?;
        let new_balance = self
            .balances
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow("recipient balance"))?;

        self.total_supply = new_supply;
        self.balances.set(to, new_balance);
        Ok(())
    }

    /// Destroy `amount` tokens from `from`'s balance (owner only)
    ///
    /// Buffers a Burn event until [`TokenLedger::take_events`] drains it.
    ///
    /// Ownership is checked before the balance.
    pub fn burn(&mut self, caller: &AccountId, from: &AccountId, amount: Amount) -> LedgerResult<()> {
        self.try_burn(caller, from, amount).inspect_err(|e| {
            warn!(caller = %caller, from = %from, amount = %amount, error = %e, "burn rejected")
        })?;

        debug!(from = %from, amount = %amount, total_supply = %self.total_supply, "burn committed");
        self.emit(
            caller,
            TokenEventKind::Burn {
                from: from.clone(),
                amount,
            },
        );
        Ok(())
    }

    fn try_burn(&mut self, caller: &AccountId, from: &AccountId, amount: Amount) -> LedgerResult<()> {
        self.ensure_owner(caller)?;

        let new_balance = self
            .balances
            .balance_of(from)
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance(BalanceOperation::Burn))?;
        let new_supply = self
            .total_supply
            .checked_sub(amount)
            .ok_or(LedgerError::Overflow("total supply"))?;

        self.balances.set(from, new_balance);
        self.total_supply = new_supply;
        Ok(())
    }

    // Internals

    fn ensure_owner(&self, caller: &AccountId) -> LedgerResult<()> {
        if caller != &self.owner {
            return Err(LedgerError::NotOwner);
        }
        Ok(())
    }

    /// Debit `from` and credit `to`; both writes happen or neither does
    fn move_balance(&mut self, from: &AccountId, to: &AccountId, amount: Amount) -> LedgerResult<()> {
        let new_from = self
            .balances
            .balance_of(from)
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance(BalanceOperation::Transfer))?;

        if from == to {
            return Ok(());
        }

        let new_to = self
            .balances
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow("recipient balance"))?;

        self.balances.set(from, new_from);
        self.balances.set(to, new_to);
        Ok(())
    }

    fn emit(&mut self, caller: &AccountId, kind: TokenEventKind) {
        self.pending_events.push(TokenEvent::new(caller.clone(), kind));
    }

    // Events, snapshots and integrity

    /// Drain notifications emitted since the last call
    ///
    /// The buffer is unbounded, so long-lived ledgers should call this after each
    /// batch of operations.
    pub fn take_events(&mut self) -> Vec<TokenEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Number of events waiting to be drained
    pub fn pending_event_count(&self) -> usize {
        self.pending_events.len()
    }

    /// Serializable copy of the current state
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            metadata: self.metadata.clone(),
            owner: self.owner.clone(),
            total_supply: self.total_supply,
            balances: self.balances.to_map(),
            allowances: self.allowances.entries(),
        }
    }

    /// Check that the total supply equals the sum of all balances
    pub fn validate_integrity(&self) -> IntegrityReport {
        let sum_of_balances = self.balances.checked_sum();
        let mut issues = Vec::new();

        match sum_of_balances {
            Some(sum) if sum != self.total_supply => issues.push(format!(
                "Total supply does not match balances: total supply = {}, sum of balances = {}",
                self.total_supply, sum
            )),
            None => issues.push("Sum of balances overflows the supply type".to_string()),
            _ => {}
        }

        IntegrityReport {
            is_valid: issues.is_empty(),
            issues,
            total_supply: self.total_supply,
            sum_of_balances,
            holder_count: self.balances.len(),
            allowance_count: self.allowances.len(),
        }
    }
}

impl fmt::Debug for TokenLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenLedger")
            .field("metadata", &self.metadata)
            .field("owner", &self.owner)
            .field("total_supply", &self.total_supply)
            .field("holders", &self.balances.len())
            .field("allowances", &self.allowances.len())
            .finish_non_exhaustive()
    }
}
