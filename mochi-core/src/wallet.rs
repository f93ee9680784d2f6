//! Points wallet — per-user balances backed by an append-only ledger.
//!
//! Every balance change flows through [`WalletStore::add_transaction`], so
//! the ledger is the source of truth and balances are a running
//! materialization of it. A refused debit records nothing.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, Result};
use crate::types::{TransactionId, UserId};

/// Direction of a wallet transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Points credited (check-in, reading streak, promotion).
    Earn,
    /// Points spent on a coupon or product redemption.
    Redeem,
}

/// A single ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction ID.
    pub id: TransactionId,
    /// The user whose balance changed.
    pub user: UserId,
    /// Credit or debit.
    pub kind: TransactionKind,
    /// Points moved. Always positive.
    pub amount: u64,
    /// Operator-facing note ("daily check-in", product name, ...).
    pub note: String,
    /// When the transaction was recorded.
    pub at: DateTime<Utc>,
}

/// Thread-safe wallet store. `Clone` shares the underlying state.
pub struct WalletStore {
    inner: Arc<Mutex<WalletInner>>,
}

struct WalletInner {
    balances: HashMap<UserId, u64>,
    ledger: Vec<Transaction>,
    total_earned: u64,
    total_redeemed: u64,
    total_rejected: u64,
}

/// Aggregate statistics about the wallet store.
#[derive(Debug, Clone)]
pub struct WalletStats {
    /// Ledger length across all users.
    pub transactions: usize,
    /// Sum of all credits.
    pub total_earned: u64,
    /// Sum of all debits.
    pub total_redeemed: u64,
    /// Debits refused for insufficient balance.
    pub total_rejected: u64,
}

impl WalletStore {
    /// Create an empty wallet store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(WalletInner {
                balances: HashMap::new(),
                ledger: Vec::new(),
                total_earned: 0,
                total_redeemed: 0,
                total_rejected: 0,
            })),
        }
    }

    /// Current balance for a user. Unknown users have a balance of zero.
    #[must_use]
    pub fn balance(&self, user: UserId) -> u64 {
        self.inner.lock().balances.get(&user).copied().unwrap_or(0)
    }

    /// Record a transaction and apply it to the user's balance.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` for a zero amount, and `InsufficientBalance`
    /// for a debit exceeding the current balance. Neither mutates anything.
    pub fn add_transaction(
        &self,
        user: UserId,
        kind: TransactionKind,
        amount: u64,
        note: impl Into<String>,
    ) -> Result<Transaction> {
        if amount == 0 {
            return Err(CoreError::InvalidAmount);
        }

        let mut inner = self.inner.lock();
        let current = inner.balances.get(&user).copied().unwrap_or(0);

        let next = match kind {
            TransactionKind::Earn => current.saturating_add(amount),
            TransactionKind::Redeem => {
                if amount > current {
                    inner.total_rejected += 1;
                    return Err(CoreError::InsufficientBalance {
                        needed: amount,
                        available: current,
                    });
                }
                current - amount
            }
        };

        inner.balances.insert(user, next);
        match kind {
            TransactionKind::Earn => inner.total_earned += amount,
            TransactionKind::Redeem => inner.total_redeemed += amount,
        }

        let transaction = Transaction {
            id: TransactionId::new(),
            user,
            kind,
            amount,
            note: note.into(),
            at: Utc::now(),
        };
        inner.ledger.push(transaction.clone());

        debug!(user = %user, ?kind, amount, balance = next, "wallet transaction recorded");
        Ok(transaction)
    }

    /// Ledger entries for one user, newest first.
    #[must_use]
    pub fn transactions(&self, user: UserId) -> Vec<Transaction> {
        self.inner
            .lock()
            .ledger
            .iter()
            .rev()
            .filter(|t| t.user == user)
            .cloned()
            .collect()
    }

    /// Aggregate statistics.
    #[must_use]
    pub fn stats(&self) -> WalletStats {
        let inner = self.inner.lock();
        WalletStats {
            transactions: inner.ledger.len(),
            total_earned: inner.total_earned,
            total_redeemed: inner.total_redeemed,
            total_rejected: inner.total_rejected,
        }
    }
}

impl Default for WalletStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for WalletStore {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earn_then_redeem_updates_balance() {
        let wallet = WalletStore::new();
        let user = UserId::new();

        wallet
            .add_transaction(user, TransactionKind::Earn, 120, "daily check-in")
            .expect("earn");
        wallet
            .add_transaction(user, TransactionKind::Redeem, 50, "sticker pack")
            .expect("redeem");

        assert_eq!(wallet.balance(user), 70);
    }

    #[test]
    fn overdraft_is_rejected_without_mutation() {
        let wallet = WalletStore::new();
        let user = UserId::new();

        wallet
            .add_transaction(user, TransactionKind::Earn, 30, "bonus")
            .expect("earn");
        let result = wallet.add_transaction(user, TransactionKind::Redeem, 100, "too expensive");

        assert!(matches!(
            result,
            Err(CoreError::InsufficientBalance {
                needed: 100,
                available: 30
            })
        ));
        assert_eq!(wallet.balance(user), 30);
        assert_eq!(wallet.transactions(user).len(), 1);
        assert_eq!(wallet.stats().total_rejected, 1);
    }

    #[test]
    fn zero_amount_is_rejected() {
        let wallet = WalletStore::new();
        let user = UserId::new();
        let result = wallet.add_transaction(user, TransactionKind::Earn, 0, "nothing");
        assert!(matches!(result, Err(CoreError::InvalidAmount)));
        assert_eq!(wallet.stats().transactions, 0);
    }

    #[test]
    fn ledger_is_newest_first_and_per_user() {
        let wallet = WalletStore::new();
        let alice = UserId::new();
        let bob = UserId::new();

        wallet
            .add_transaction(alice, TransactionKind::Earn, 10, "first")
            .expect("earn");
        wallet
            .add_transaction(bob, TransactionKind::Earn, 99, "other user")
            .expect("earn");
        wallet
            .add_transaction(alice, TransactionKind::Earn, 20, "second")
            .expect("earn");

        let entries = wallet.transactions(alice);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].note, "second");
        assert_eq!(entries[1].note, "first");
    }

    #[test]
    fn unknown_user_has_zero_balance() {
        let wallet = WalletStore::new();
        assert_eq!(wallet.balance(UserId::new()), 0);
    }

    #[test]
    fn clone_shares_state() {
        let wallet1 = WalletStore::new();
        let wallet2 = wallet1.clone();
        let user = UserId::new();

        wallet1
            .add_transaction(user, TransactionKind::Earn, 5, "shared")
            .expect("earn");
        assert_eq!(wallet2.balance(user), 5);
    }

    #[test]
    fn stats_track_totals() {
        let wallet = WalletStore::new();
        let user = UserId::new();

        wallet
            .add_transaction(user, TransactionKind::Earn, 100, "a")
            .expect("earn");
        wallet
            .add_transaction(user, TransactionKind::Redeem, 40, "b")
            .expect("redeem");

        let stats = wallet.stats();
        assert_eq!(stats.transactions, 2);
        assert_eq!(stats.total_earned, 100);
        assert_eq!(stats.total_redeemed, 40);
        assert_eq!(stats.total_rejected, 0);
    }
}
