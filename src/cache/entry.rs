//! Cache entry codec
//!
//! The only shape that crosses the cache boundary. Raw cache payloads are
//! decoded here into typed entries; nothing else handles untyped data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::BalanceChange;
use crate::domain::{Amount, TransactionKind};

use super::CacheError;

/// Key prefix for an account's recent-activity list
pub const KEY_PREFIX: &str = "transactions:";

/// Cache key for a login
pub fn cache_key(login: &str) -> String {
    format!("{KEY_PREFIX}{login}")
}

/// Denormalized projection of a ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub kind: TransactionKind,
    pub amount: Amount,
    pub occurred_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(kind: TransactionKind, amount: Amount, occurred_at: DateTime<Utc>) -> Self {
        Self {
            kind,
            amount,
            occurred_at,
        }
    }

    pub fn encode(&self) -> Result<String, CacheError> {
        serde_json::to_string(self).map_err(|e| CacheError::Codec(e.to_string()))
    }

    pub fn decode(raw: &str) -> Result<Self, CacheError> {
        serde_json::from_str(raw).map_err(|e| CacheError::Codec(e.to_string()))
    }
}

impl From<&BalanceChange> for CacheEntry {
    fn from(change: &BalanceChange) -> Self {
        Self::new(change.kind, change.amount, change.occurred_at)
    }
}
