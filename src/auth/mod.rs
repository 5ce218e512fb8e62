//! Authentication module
//!
//! Password hashing and bearer-token identity. The rest of the crate only
//! depends on [`PrincipalProvider`].

mod jwt;
mod password;

pub use jwt::{Claims, JwtService};
pub use password::{hash_password, hash_password_blocking, verify_password, verify_password_blocking};

use crate::domain::AuthenticatedPrincipal;

/// Turns a bearer credential into a verified principal
pub trait PrincipalProvider: Send + Sync {
    fn authenticate(&self, bearer_token: &str) -> Result<AuthenticatedPrincipal, AuthError>;
}

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing or malformed Authorization header")]
    MissingCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Token creation failed: {0}")]
    TokenCreation(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

impl AuthError {
    /// Errors caused by the caller's credentials (401) rather than the server
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AuthError::MissingCredentials | AuthError::InvalidToken(_) | AuthError::TokenExpired
        )
    }
}
