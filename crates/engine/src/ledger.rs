//! Fungible-token transfer primitive.
//!
//! The engine never holds token balances itself; it pulls mint payments and
//! pushes rescues through this seam. The in-memory ledger backs tests and
//! single-process hosts; the mock records calls for assertion.

use boostpass_types::{Address, Amount};
use parking_lot::RwLock;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("insufficient funds: balance={balance}, requested={requested}")]
    InsufficientFunds { balance: Amount, requested: Amount },

    #[error("unknown token: {token}")]
    UnknownToken { token: String },

    #[error("transfer rejected by token contract")]
    TransferRejected,
}

/// Interface to the external fungible-token ledger.
pub trait TokenLedger: Send + Sync {
    /// Move `amount` of `token` from `from` to `to`. All-or-nothing.
    fn transfer(
        &self,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), LedgerError>;
}

/// Balance map keyed by (token, account).
#[derive(Debug, Default)]
pub struct InMemoryTokenLedger {
    balances: RwLock<HashMap<Address, HashMap<Address, Amount>>>,
}

impl InMemoryTokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account balance for a token. Creates the token if unknown.
    pub fn credit(&self, token: &Address, account: &Address, amount: Amount) {
        let mut balances = self.balances.write();
        let entry = balances
            .entry(*token)
            .or_default()
            .entry(*account)
            .or_default();
        *entry = entry.saturating_add(amount);
    }

    pub fn balance_of(&self, token: &Address, account: &Address) -> Amount {
        let balances = self.balances.read();
        balances
            .get(token)
            .and_then(|accounts| accounts.get(account))
            .copied()
            .unwrap_or(0)
    }
}

impl TokenLedger for InMemoryTokenLedger {
    fn transfer(
        &self,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let mut balances = self.balances.write();
        let accounts = balances.get_mut(token).ok_or(LedgerError::UnknownToken {
            token: token.to_string(),
        })?;

        let from_balance = accounts.get(from).copied().unwrap_or(0);
        if from_balance < amount {
            return Err(LedgerError::InsufficientFunds {
                balance: from_balance,
                requested: amount,
            });
        }

        accounts.insert(*from, from_balance - amount);
        let to_balance = accounts.entry(*to).or_default();
        *to_balance = to_balance.saturating_add(amount);
        Ok(())
    }
}

/// One recorded transfer attempt against the mock ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferCall {
    pub token: Address,
    pub from: Address,
    pub to: Address,
    pub amount: Amount,
}

/// Call-recording ledger with scriptable failures.
#[derive(Debug, Default)]
pub struct MockTokenLedger {
    calls: RwLock<Vec<TransferCall>>,
    fail_next: RwLock<bool>,
}

impl MockTokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `transfer` call fail with `TransferRejected`.
    pub fn fail_next_transfer(&self) {
        *self.fail_next.write() = true;
    }

    pub fn calls(&self) -> Vec<TransferCall> {
        self.calls.read().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.write().clear();
    }
}

impl TokenLedger for MockTokenLedger {
    fn transfer(
        &self,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.calls.write().push(TransferCall {
            token: *token,
            from: *from,
            to: *to,
            amount,
        });

        let mut fail = self.fail_next.write();
        if *fail {
            *fail = false;
            return Err(LedgerError::TransferRejected);
        }
        Ok(())
    }
}
