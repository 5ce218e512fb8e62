//! Redis cache repository
//!
//! Each login maps to a Redis list of JSON-encoded [`CacheEntry`] values.
//! `LPUSH` + `LTRIM` run in one atomic pipeline so the list never exceeds
//! the capacity.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use super::{cache_key, CacheEntry, CacheError, CacheRepository, DEFAULT_HISTORY_CAPACITY};

/// Redis-backed recent-activity cache
#[derive(Clone)]
pub struct RedisCacheRepository {
    redis: ConnectionManager,
    capacity: usize,
}

impl RedisCacheRepository {
    pub fn new(redis: ConnectionManager) -> Self {
        Self {
            redis,
            capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Connect to `redis_url` and build a repository
    pub async fn connect(redis_url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let manager = ConnectionManager::new(client).await?;
        Ok(Self::new(manager))
    }
}

#[async_trait]
impl CacheRepository for RedisCacheRepository {
    async fn push(&self, login: &str, entry: &CacheEntry) -> Result<(), CacheError> {
        let key = cache_key(login);
        let payload = entry.encode()?;
        let last_index = isize::try_from(self.capacity).unwrap_or(isize::MAX) - 1;

        let mut conn = self.redis.clone();
        redis::pipe()
            .atomic()
            .lpush(&key, payload)
            .ignore()
            .ltrim(&key, 0, last_index)
            .ignore()
            .query_async::<_, ()>(&mut conn)
            .await?;

        Ok(())
    }

    async fn recent(&self, login: &str) -> Result<Vec<CacheEntry>, CacheError> {
        let key = cache_key(login);
        let raw: Vec<String> = self.redis.clone().lrange(&key, 0, -1).await?;

        let entries = raw
            .iter()
            .filter_map(|payload| match CacheEntry::decode(payload) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Skipping undecodable cache entry");
                    None
                }
            })
            .collect();

        Ok(entries)
    }
}
