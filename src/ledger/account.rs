//! Per-account balance and allowance books

use std::collections::BTreeMap;

use crate::traits::AllowanceEntry;
use crate::types::*;

/// Balances keyed by account; absent entries read as zero
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceBook {
    balances: BTreeMap<AccountId, Amount>,
}

impl BalanceBook {
    /// Create an empty book
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_map(balances: BTreeMap<AccountId, Amount>) -> Self {
        let mut book = Self::new();
        for (account, amount) in balances {
            book.set(&account, amount);
        }
        book
    }

    /// Balance of `account`, zero when never credited
    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Overwrite the balance of `account`; zero removes the entry
    pub(crate) fn set(&mut self, account: &AccountId, amount: Amount) {
        if amount == 0 {
            self.balances.remove(account);
        } else {
            self.balances.insert(account.clone(), amount);
        }
    }

    /// Accounts holding a non-zero balance, in identity order
    pub fn holders(&self) -> impl Iterator<Item = (&AccountId, Amount)> {
        self.balances.iter().map(|(account, amount)| (account, *amount))
    }

    /// Number of accounts with a non-zero balance
    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Sum of all balances, `None` on overflow
    pub fn checked_sum(&self) -> Option<Amount> {
        self.balances
            .values()
            .try_fold(0 as Amount, |acc, amount| acc.checked_add(*amount))
    }

    pub(crate) fn to_map(&self) -> BTreeMap<AccountId, Amount> {
        self.balances.clone()
    }
}

/// Allowances keyed by (owner, spender); absent entries read as zero
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowanceBook {
    allowances: BTreeMap<(AccountId, AccountId), Amount>,
}

impl AllowanceBook {
    /// Create an empty book
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_entries(entries: Vec<AllowanceEntry>) -> Self {
        let mut book = Self::new();
        for entry in entries {
            book.set(&entry.owner, &entry.spender, entry.amount);
        }
        book
    }

    /// Remaining amount `spender` may move out of `owner`'s balance
    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> Amount {
        self.allowances
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(0)
    }

    /// Overwrite an allowance; zero removes the entry
    pub(crate) fn set(&mut self, owner: &AccountId, spender: &AccountId, amount: Amount) {
        let key = (owner.clone(), spender.clone());
        if amount == 0 {
            self.allowances.remove(&key);
        } else {
            self.allowances.insert(key, amount);
        }
    }

    /// Number of non-zero allowances
    pub fn len(&self) -> usize {
        self.allowances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allowances.is_empty()
    }

    /// Non-zero allowances ordered by (owner, spender)
    pub fn entries(&self) -> Vec<AllowanceEntry> {
        self.allowances
            .iter()
            .map(|((owner, spender), amount)| AllowanceEntry {
                owner: owner.clone(),
                spender: spender.clone(),
                amount: *amount,
            })
            .collect()
    }
}
