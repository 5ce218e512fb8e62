//! Ledger Errors
//!
//! Error types for ledger store operations.

/// Errors that can occur in the ledger store
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Unique index on login violated
    #[error("Login already exists: {0}")]
    DuplicateLogin(String),

    /// Unique index on national id violated
    #[error("National id already exists: {0}")]
    DuplicateNationalId(String),

    /// No account for the given login
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
