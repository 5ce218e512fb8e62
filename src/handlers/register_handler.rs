//! Register Handler
//!
//! Opens new accounts. Uniqueness is checked up front (login first) and
//! enforced again by the store's unique indexes.

use std::sync::Arc;

use crate::aggregate::{Account, NewAccount};
use crate::auth::hash_password_blocking;
use crate::domain::{Balance, DomainError, OperationContext};
use crate::error::AppError;
use crate::ledger::LedgerRepository;

use super::{AccountView, RegisterAccountCommand};

/// Handler for account registration
pub struct RegisterAccountHandler {
    ledger: Arc<dyn LedgerRepository>,
}

impl RegisterAccountHandler {
    pub fn new(ledger: Arc<dyn LedgerRepository>) -> Self {
        Self { ledger }
    }

    /// Execute the register command
    pub async fn execute(
        &self,
        command: RegisterAccountCommand,
        context: &OperationContext,
    ) -> Result<AccountView, AppError> {
        if self.ledger.exists_by_login(&command.login).await? {
            return Err(DomainError::DuplicateLogin(command.login).into());
        }

        if self.ledger.exists_by_national_id(&command.national_id).await? {
            return Err(DomainError::DuplicateNationalId(command.national_id).into());
        }

        let password_hash = hash_password_blocking(command.password).await?;

        let account = Account::create(NewAccount {
            full_name: command.full_name,
            national_id: command.national_id,
            login: command.login,
            password_hash,
            initial_balance: Balance::new(command.initial_balance),
        });

        // Unique-index races surface as the same duplicate errors
        self.ledger.insert_account(&account).await?;

        tracing::info!(
            account_id = %account.id(),
            login = %account.login(),
            balance = %account.balance(),
            correlation_id = ?context.correlation_id,
            "Account registered"
        );

        Ok(AccountView::from(&account))
    }
}
