//! Shared application state
//!
//! Everything the routes need, behind trait objects so the same router runs
//! against Postgres/Redis in production and in-memory doubles in tests.

use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::{JwtService, PrincipalProvider};
use crate::cache::CacheRepository;
use crate::config::Config;
use crate::ledger::LedgerRepository;

#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<dyn LedgerRepository>,
    pub cache: Arc<dyn CacheRepository>,
    pub principals: Arc<dyn PrincipalProvider>,
    pub jwt: JwtService,
    pub min_initial_balance: Decimal,
    pub cache_timeout: Duration,
}

impl AppState {
    /// State with default limits; bearer tokens are verified by `jwt`
    pub fn new(ledger: Arc<dyn LedgerRepository>, cache: Arc<dyn CacheRepository>, jwt: JwtService) -> Self {
        Self {
            ledger,
            cache,
            principals: Arc::new(jwt.clone()),
            jwt,
            min_initial_balance: Decimal::ONE,
            cache_timeout: Duration::from_millis(500),
        }
    }

    /// State configured from the environment
    pub fn from_config(
        config: &Config,
        ledger: Arc<dyn LedgerRepository>,
        cache: Arc<dyn CacheRepository>,
    ) -> Self {
        let jwt = JwtService::new(&config.jwt_secret, config.jwt_expiration_secs);
        Self::new(ledger, cache, jwt)
            .with_min_initial_balance(config.min_initial_balance)
            .with_cache_timeout(config.cache_timeout)
    }

    pub fn with_min_initial_balance(mut self, min_initial_balance: Decimal) -> Self {
        self.min_initial_balance = min_initial_balance;
        self
    }

    pub fn with_cache_timeout(mut self, timeout: Duration) -> Self {
        self.cache_timeout = timeout;
        self
    }
}
