//! Account queries

use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppError;
use crate::handlers::AccountView;
use crate::ledger::LedgerRepository;

pub struct AccountQueryService {
    ledger: Arc<dyn LedgerRepository>,
}

impl AccountQueryService {
    pub fn new(ledger: Arc<dyn LedgerRepository>) -> Self {
        Self { ledger }
    }

    /// All accounts ordered by creation time
    pub async fn list_accounts(&self) -> Result<Vec<AccountView>, AppError> {
        let accounts = self.ledger.list_accounts().await?;
        Ok(accounts.iter().map(AccountView::from).collect())
    }

    pub async fn get_account(&self, id: Uuid) -> Result<AccountView, AppError> {
        self.ledger
            .find_by_id(id)
            .await?
            .map(|account| AccountView::from(&account))
            .ok_or_else(|| AppError::AccountNotFound(id.to_string()))
    }
}
