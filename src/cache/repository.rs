//! Recent-activity cache contract

use async_trait::async_trait;

use super::{CacheEntry, CacheError};

/// Default number of entries kept per account
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Bounded, newest-first list of recent transactions per login.
///
/// Not a system of record: callers must tolerate missing or stale entries.
#[async_trait]
pub trait CacheRepository: Send + Sync {
    /// Prepend an entry and drop anything beyond the capacity
    async fn push(&self, login: &str, entry: &CacheEntry) -> Result<(), CacheError>;

    /// All retained entries, newest first
    async fn recent(&self, login: &str) -> Result<Vec<CacheEntry>, CacheError>;
}
