//! Ledger Repository contract
//!
//! The durable store of accounts and ledger entries. Balance mutations go
//! through a [`LedgerTransaction`], which holds the account row exclusively
//! until it is committed or dropped (dropping rolls back).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::aggregate::{Account, BalanceChange};
use crate::domain::{Amount, TransactionKind};

use super::LedgerError;

/// Settled, immutable ledger record
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub account_id: Uuid,
    pub kind: TransactionKind,
    pub amount: Amount,
    pub occurred_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Ledger record for a computed change
    pub fn from_change(change: &BalanceChange) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id: change.account_id,
            kind: change.kind,
            amount: change.amount,
            occurred_at: change.occurred_at,
        }
    }
}

/// Durable account + ledger storage
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    async fn find_by_login(&self, login: &str) -> Result<Option<Account>, LedgerError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, LedgerError>;

    /// All accounts, oldest first
    async fn list_accounts(&self) -> Result<Vec<Account>, LedgerError>;

    async fn exists_by_login(&self, login: &str) -> Result<bool, LedgerError>;

    async fn exists_by_national_id(&self, national_id: &str) -> Result<bool, LedgerError>;

    /// Persist a new account.
    ///
    /// # Errors
    /// `DuplicateLogin` / `DuplicateNationalId` when a unique index rejects it.
    async fn insert_account(&self, account: &Account) -> Result<(), LedgerError>;

    /// Open a transaction holding the account row for `login`.
    ///
    /// # Errors
    /// `AccountNotFound` when no account has that login.
    async fn begin(&self, login: &str) -> Result<Box<dyn LedgerTransaction>, LedgerError>;
}

/// Single-account unit of work
#[async_trait]
pub trait LedgerTransaction: Send {
    /// Account state as locked by this transaction
    fn account(&self) -> &Account;

    /// Store the new balance and append the ledger entry atomically
    async fn commit(self: Box<Self>, change: &BalanceChange) -> Result<LedgerEntry, LedgerError>;
}
