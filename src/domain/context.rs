//! Operation Context
//!
//! Explicit per-request context: who is calling and how to trace the call.
//! Handlers receive it as an argument instead of looking up ambient state.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use uuid::Uuid;

use super::DomainError;

/// Verified identity of the caller, produced by a `PrincipalProvider`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedPrincipal {
    pub login: String,
}

impl AuthenticatedPrincipal {
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
        }
    }
}

/// Context for an operation, used for authorization and tracing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperationContext {
    /// Authenticated caller, absent on public endpoints
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<AuthenticatedPrincipal>,

    /// Correlation ID for request tracing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<Uuid>,

    /// Client IP address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_ip: Option<IpAddr>,
}

impl OperationContext {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create context with an authenticated principal
    pub fn with_principal(mut self, principal: AuthenticatedPrincipal) -> Self {
        self.principal = Some(principal);
        self
    }

    /// Create context with correlation ID
    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    /// Create context with client IP
    pub fn with_client_ip(mut self, ip: IpAddr) -> Self {
        self.client_ip = Some(ip);
        self
    }

    /// Generate a new correlation ID if not present
    pub fn ensure_correlation_id(&mut self) -> Uuid {
        *self.correlation_id.get_or_insert_with(Uuid::new_v4)
    }

    /// Login of the authenticated caller
    pub fn login(&self) -> Result<&str, DomainError> {
        self.principal
            .as_ref()
            .map(|p| p.login.as_str())
            .ok_or(DomainError::Unauthenticated)
    }
}
