//! Common test utilities
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};
use tower::util::ServiceExt;

use cqrs_banking::api::build_router;
use cqrs_banking::auth::JwtService;
use cqrs_banking::cache::InMemoryCacheRepository;
use cqrs_banking::ledger::InMemoryLedgerRepository;
use cqrs_banking::AppState;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// Router wired to in-memory doubles
pub struct TestApp {
    pub router: Router,
    pub ledger: Arc<InMemoryLedgerRepository>,
    pub cache: Arc<InMemoryCacheRepository>,
    pub jwt: JwtService,
}

pub fn test_app() -> TestApp {
    let ledger = Arc::new(InMemoryLedgerRepository::new());
    let cache = Arc::new(InMemoryCacheRepository::new());
    let jwt = JwtService::new(TEST_JWT_SECRET, 3600);

    let state = AppState::new(ledger.clone(), cache.clone(), jwt.clone());

    TestApp {
        router: build_router(state),
        ledger,
        cache,
        jwt,
    }
}

impl TestApp {
    /// Send a request and return status plus parsed JSON body (Null when empty)
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    /// Register an account and return a bearer token for it
    pub async fn register_and_login(&self, login: &str, national_id: &str, initial_balance: &str) -> String {
        let (status, _) = self
            .send(
                "POST",
                "/api/commands/users/register",
                None,
                Some(serde_json::json!({
                    "fullName": format!("{} Test", login),
                    "nationalId": national_id,
                    "login": login,
                    "password": "secret123",
                    "initialBalance": initial_balance,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "registration of {} failed", login);

        let (status, body) = self
            .send(
                "POST",
                "/api/auth/login",
                None,
                Some(serde_json::json!({ "login": login, "password": "secret123" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login of {} failed", login);

        body["token"].as_str().unwrap().to_string()
    }
}

/// Setup test database - truncate tables for a fresh state
pub async fn setup_test_db() -> PgPool {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    // Plain &str runs as a simple query, so the multi-statement file works
    pool.execute(include_str!("../../migrations/0001_init.sql"))
        .await
        .expect("Failed to apply migrations");

    sqlx::query("TRUNCATE TABLE ledger_entries, accounts CASCADE")
        .execute(&pool)
        .await
        .expect("Failed to clean up DB");

    pool
}
