//! In-memory Ledger Repository
//!
//! Test double with the same contract as the Postgres store. A transaction
//! holds the whole store lock, so mutations are serialized.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::aggregate::{Account, BalanceChange};

use super::{LedgerEntry, LedgerError, LedgerRepository, LedgerTransaction};

#[derive(Debug, Default)]
struct LedgerState {
    /// Insertion order doubles as creation order
    accounts: Vec<Account>,
    entries: Vec<LedgerEntry>,
}

impl LedgerState {
    fn by_login(&self, login: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.login() == login)
    }
}

/// Process-local ledger
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedgerRepository {
    state: Arc<Mutex<LedgerState>>,
}

impl InMemoryLedgerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ledger entries across all accounts
    pub async fn entry_count(&self) -> usize {
        self.state.lock().await.entries.len()
    }
}

#[async_trait]
impl LedgerRepository for InMemoryLedgerRepository {
    async fn find_by_login(&self, login: &str) -> Result<Option<Account>, LedgerError> {
        Ok(self.state.lock().await.by_login(login).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, LedgerError> {
        let state = self.state.lock().await;
        Ok(state.accounts.iter().find(|a| a.id() == id).cloned())
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, LedgerError> {
        Ok(self.state.lock().await.accounts.clone())
    }

    async fn exists_by_login(&self, login: &str) -> Result<bool, LedgerError> {
        Ok(self.state.lock().await.by_login(login).is_some())
    }

    async fn exists_by_national_id(&self, national_id: &str) -> Result<bool, LedgerError> {
        let state = self.state.lock().await;
        Ok(state.accounts.iter().any(|a| a.national_id() == national_id))
    }

    async fn insert_account(&self, account: &Account) -> Result<(), LedgerError> {
        let mut state = self.state.lock().await;

        if state.by_login(account.login()).is_some() {
            return Err(LedgerError::DuplicateLogin(account.login().to_string()));
        }
        if state
            .accounts
            .iter()
            .any(|a| a.national_id() == account.national_id())
        {
            return Err(LedgerError::DuplicateNationalId(account.national_id().to_string()));
        }

        state.accounts.push(account.clone());
        Ok(())
    }

    async fn begin(&self, login: &str) -> Result<Box<dyn LedgerTransaction>, LedgerError> {
        let guard = self.state.clone().lock_owned().await;

        let account = guard
            .by_login(login)
            .cloned()
            .ok_or_else(|| LedgerError::AccountNotFound(login.to_string()))?;

        Ok(Box::new(InMemoryLedgerTransaction { guard, account }))
    }
}

/// Exclusive handle on the in-memory store
pub struct InMemoryLedgerTransaction {
    guard: OwnedMutexGuard<LedgerState>,
    account: Account,
}

#[async_trait]
impl LedgerTransaction for InMemoryLedgerTransaction {
    fn account(&self) -> &Account {
        &self.account
    }

    async fn commit(self: Box<Self>, change: &BalanceChange) -> Result<LedgerEntry, LedgerError> {
        let InMemoryLedgerTransaction { mut guard, account } = *self;
        let entry = LedgerEntry::from_change(change);

        let slot = guard
            .accounts
            .iter_mut()
            .find(|a| a.id() == account.id())
            .ok_or_else(|| LedgerError::AccountNotFound(account.login().to_string()))?;
        *slot = account.apply(change);

        guard.entries.push(entry.clone());
        Ok(entry)
    }
}
