//! Balance Command Handler
//!
//! Deposit, withdraw and payBill. The read-modify-write of the balance and
//! the ledger append happen inside one ledger transaction; the cache is
//! written only after that transaction commits.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheEntry, CacheError, CacheRepository};
use crate::domain::{Amount, OperationContext};
use crate::error::AppError;
use crate::ledger::LedgerRepository;

use super::{BalanceCommand, CommandResult};

/// Handler for balance-changing commands
pub struct BalanceCommandHandler {
    ledger: Arc<dyn LedgerRepository>,
    cache: Arc<dyn CacheRepository>,
    cache_timeout: Duration,
}

impl BalanceCommandHandler {
    pub fn new(
        ledger: Arc<dyn LedgerRepository>,
        cache: Arc<dyn CacheRepository>,
        cache_timeout: Duration,
    ) -> Self {
        Self {
            ledger,
            cache,
            cache_timeout,
        }
    }

    pub async fn deposit(&self, amount: Amount, context: &OperationContext) -> Result<CommandResult, AppError> {
        self.execute(BalanceCommand::deposit(amount), context).await
    }

    pub async fn withdraw(&self, amount: Amount, context: &OperationContext) -> Result<CommandResult, AppError> {
        self.execute(BalanceCommand::withdraw(amount), context).await
    }

    pub async fn pay_bill(&self, amount: Amount, context: &OperationContext) -> Result<CommandResult, AppError> {
        self.execute(BalanceCommand::pay_bill(amount), context).await
    }

    /// Execute a balance command for the authenticated caller
    pub async fn execute(
        &self,
        command: BalanceCommand,
        context: &OperationContext,
    ) -> Result<CommandResult, AppError> {
        let login = context.login()?;

        // Holds the account row until commit or drop
        let tx = self.ledger.begin(login).await?;
        let change = tx.account().settle(command.kind, &command.amount)?;
        let entry = tx.commit(&change).await?;

        if let Err(e) = self.push_recent(login, CacheEntry::from(&change)).await {
            tracing::warn!(
                login = %login,
                entry_id = %entry.id,
                error = %e,
                "Recent-activity cache write failed; ledger is unaffected"
            );
        }

        tracing::info!(
            account_id = %change.account_id,
            kind = %change.kind,
            amount = %change.amount,
            previous_balance = %change.previous_balance,
            new_balance = %change.new_balance,
            interest = %change.interest,
            correlation_id = ?context.correlation_id,
            "Balance command applied"
        );

        Ok(CommandResult::from(&change))
    }

    async fn push_recent(&self, login: &str, entry: CacheEntry) -> Result<(), CacheError> {
        match tokio::time::timeout(self.cache_timeout, self.cache.push(login, &entry)).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout(self.cache_timeout.as_millis() as u64)),
        }
    }
}
