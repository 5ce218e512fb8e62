//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use thiserror::Error;

/// Business rule violations and lookup failures.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Login already registered
    #[error("Login already in use: {0}")]
    DuplicateLogin(String),

    /// National id already registered
    #[error("National id already registered: {0}")]
    DuplicateNationalId(String),

    /// Resolved identity has no backing account
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Credentials did not match
    #[error("Invalid login or password")]
    InvalidCredentials,

    /// Protected operation invoked without a principal
    #[error("Authentication required")]
    Unauthenticated,

    /// A mutation would push the balance past what the ledger can store
    #[error("Resulting balance is out of range")]
    BalanceOutOfRange,
}
