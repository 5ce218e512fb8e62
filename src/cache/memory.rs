//! In-memory cache repository
//!
//! Test double with the same capped, newest-first semantics as Redis.
//! Can be switched offline to exercise cache-failure paths.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{CacheEntry, CacheError, CacheRepository, DEFAULT_HISTORY_CAPACITY};

#[derive(Debug, Clone)]
pub struct InMemoryCacheRepository {
    lists: Arc<Mutex<HashMap<String, VecDeque<CacheEntry>>>>,
    capacity: usize,
    offline: Arc<AtomicBool>,
}

impl Default for InMemoryCacheRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCacheRepository {
    pub fn new() -> Self {
        Self {
            lists: Arc::new(Mutex::new(HashMap::new())),
            capacity: DEFAULT_HISTORY_CAPACITY,
            offline: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Make every call fail with `CacheError::Unavailable`
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), CacheError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(CacheError::Unavailable("in-memory cache is offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheRepository for InMemoryCacheRepository {
    async fn push(&self, login: &str, entry: &CacheEntry) -> Result<(), CacheError> {
        self.check_online()?;

        let mut lists = self.lists.lock().await;
        let list = lists.entry(login.to_string()).or_default();
        list.push_front(entry.clone());
        list.truncate(self.capacity);
        Ok(())
    }

    async fn recent(&self, login: &str) -> Result<Vec<CacheEntry>, CacheError> {
        self.check_online()?;

        let lists = self.lists.lock().await;
        Ok(lists
            .get(login)
            .map(|list| list.iter().cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Amount, TransactionKind};
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;

    fn entry(n: i64) -> CacheEntry {
        CacheEntry::new(
            TransactionKind::Deposit,
            Amount::new(Decimal::from(n)).unwrap(),
            Utc::now() + Duration::seconds(n),
        )
    }

    #[tokio::test]
    async fn test_push_is_newest_first_and_capped() {
        let cache = InMemoryCacheRepository::new().with_capacity(3);
        for n in 1..=5 {
            cache.push("alice", &entry(n)).await.unwrap();
        }

        let recent = cache.recent("alice").await.unwrap();
        let amounts: Vec<String> = recent.iter().map(|e| e.amount.to_string()).collect();
        assert_eq!(amounts, vec!["5.00", "4.00", "3.00"]);
    }

    #[tokio::test]
    async fn test_lists_are_per_login() {
        let cache = InMemoryCacheRepository::new();
        cache.push("alice", &entry(1)).await.unwrap();

        assert_eq!(cache.recent("alice").await.unwrap().len(), 1);
        assert!(cache.recent("bob").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_offline() {
        let cache = InMemoryCacheRepository::new();
        cache.set_offline(true);

        assert!(matches!(cache.push("alice", &entry(1)).await, Err(CacheError::Unavailable(_))));
        assert!(cache.recent("alice").await.is_err());

        cache.set_offline(false);
        assert!(cache.recent("alice").await.unwrap().is_empty());
    }
}
