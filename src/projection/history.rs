//! History Projector
//!
//! Serves `{totalBalance, transactions}` for the caller. The balance comes
//! from the ledger; the transaction list comes from the cache and may lag
//! behind it.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheEntry, CacheError, CacheRepository};
use crate::domain::{Amount, Balance, DomainError};
use crate::error::AppError;
use crate::ledger::LedgerRepository;

/// Timestamp format of history rows (`dd-MM-yyyy HH:mm:ss`, UTC)
pub const HISTORY_DATE_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// One history row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionView {
    /// Lower-cased transaction kind, e.g. `deposito`
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: Amount,
    pub date: String,
}

impl From<&CacheEntry> for TransactionView {
    fn from(entry: &CacheEntry) -> Self {
        Self {
            kind: entry.kind.as_str().to_lowercase(),
            amount: entry.amount,
            date: entry.occurred_at.format(HISTORY_DATE_FORMAT).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryView {
    pub total_balance: Balance,
    /// Newest first
    pub transactions: Vec<TransactionView>,
}

pub struct HistoryProjector {
    ledger: Arc<dyn LedgerRepository>,
    cache: Arc<dyn CacheRepository>,
    cache_timeout: Duration,
}

impl HistoryProjector {
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

    /// Balance and recent transactions for a login
    pub async fn get_history(&self, login: &str) -> Result<HistoryView, AppError> {
        let account = self
            .ledger
            .find_by_login(login)
            .await?
            .ok_or_else(|| DomainError::AccountNotFound(login.to_string()))?;

        let entries = match self.recent(login).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(login = %login, error = %e, "Cache unavailable; serving empty history");
                Vec::new()
            }
        };

        Ok(HistoryView {
            total_balance: *account.balance(),
            transactions: entries.iter().map(TransactionView::from).collect(),
        })
    }

    async fn recent(&self, login: &str) -> Result<Vec<CacheEntry>, CacheError> {
        match tokio::time::timeout(self.cache_timeout, self.cache.recent(login)).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout(self.cache_timeout.as_millis() as u64)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransactionKind;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    #[test]
    fn test_transaction_view_format() {
        let entry = CacheEntry::new(
            TransactionKind::Payment,
            Amount::new(dec!(42.5)).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap(),
        );

        let view = TransactionView::from(&entry);
        assert_eq!(view.kind, "pagamento");
        assert_eq!(view.date, "07-03-2024 09:05:01");

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["type"], "pagamento");
        assert_eq!(json["amount"], "42.50");
    }
}
