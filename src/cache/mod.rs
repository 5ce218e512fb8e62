//! Recent-activity cache
//!
//! Bounded per-account list of recent transactions backing the history
//! query. Written only by the balance command handler after the ledger
//! commits; never consulted for balances.

mod entry;
mod memory;
mod redis;
mod repository;

pub use entry::{cache_key, CacheEntry, KEY_PREFIX};
pub use memory::InMemoryCacheRepository;
pub use self::redis::RedisCacheRepository;
pub use repository::{CacheRepository, DEFAULT_HISTORY_CAPACITY};

/// Cache errors
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] ::redis::RedisError),

    #[error("Cache codec error: {0}")]
    Codec(String),

    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    #[error("Cache operation timed out after {0} ms")]
    Timeout(u64),
}
