//! Login Handler
//!
//! Exchanges credentials for a bearer token.

use std::sync::Arc;

use crate::auth::{verify_password_blocking, JwtService};
use crate::domain::{DomainError, OperationContext};
use crate::error::AppError;
use crate::ledger::LedgerRepository;

use super::{LoginCommand, LoginResult};

pub struct LoginHandler {
    ledger: Arc<dyn LedgerRepository>,
    jwt: JwtService,
}

impl LoginHandler {
    pub fn new(ledger: Arc<dyn LedgerRepository>, jwt: JwtService) -> Self {
        Self { ledger, jwt }
    }

    /// Unknown login and wrong password fail identically
    pub async fn execute(
        &self,
        command: LoginCommand,
        context: &OperationContext,
    ) -> Result<LoginResult, AppError> {
        let Some(account) = self.ledger.find_by_login(&command.login).await? else {
            tracing::info!(login = %command.login, correlation_id = ?context.correlation_id, "Login rejected");
            return Err(DomainError::InvalidCredentials.into());
        };

        let verified =
            verify_password_blocking(command.password, account.password_hash().to_string()).await;
        if !verified {
            tracing::info!(login = %command.login, correlation_id = ?context.correlation_id, "Login rejected");
            return Err(DomainError::InvalidCredentials.into());
        }

        let token = self.jwt.issue(account.login())?;
        tracing::debug!(login = %account.login(), "Token issued");

        Ok(LoginResult { token })
    }
}
