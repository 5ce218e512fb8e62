//! API Integration Tests
//!
//! Full HTTP round trips through the router, backed by in-memory stores.

use axum::http::StatusCode;
use serde_json::{json, Value};

use cqrs_banking::ledger::LedgerRepository;

mod common;

#[tokio::test]
async fn test_health() {
    let app = common::test_app();
    let (status, _) = app.send("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_register_returns_account_view() {
    let app = common::test_app();

    let (status, body) = app
        .send(
            "POST",
            "/api/commands/users/register",
            None,
            Some(json!({
                "fullName": "Alice Silva",
                "nationalId": "12345678901",
                "login": "alice",
                "password": "secret123",
                "initialBalance": 100
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["login"], "alice");
    assert_eq!(body["nationalId"], "12345678901");
    assert_eq!(body["balance"], "100.00");
    assert!(body["id"].is_string());
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());
}

#[tokio::test]
async fn test_register_validation_errors() {
    let app = common::test_app();

    let (status, body) = app
        .send(
            "POST",
            "/api/commands/users/register",
            None,
            Some(json!({
                "fullName": " ",
                "nationalId": "123",
                "login": "bob",
                "password": "123",
                "initialBalance": "0.50"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "validation_error");
    assert!(body["fields"]["fullName"].is_string());
    assert!(body["fields"]["nationalId"].is_string());
    assert!(body["fields"]["password"].is_string());
    assert_eq!(body["fields"]["initialBalance"], "must be at least 1");
    assert!(body["fields"].get("login").is_none());
}

#[tokio::test]
async fn test_register_rejects_unstorable_initial_balance() {
    let app = common::test_app();

    let (status, body) = app
        .send(
            "POST",
            "/api/commands/users/register",
            None,
            Some(json!({
                "fullName": "Alice Silva",
                "nationalId": "12345678901",
                "login": "alice",
                "password": "secret123",
                "initialBalance": "79228162514264337593543950335"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["initialBalance"].is_string());
    assert!(app.ledger.list_accounts().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_deposit_past_balance_limit_is_rejected() {
    let app = common::test_app();
    let token = app.register_and_login("alice", "12345678901", "99999999999999999.00").await;

    let (status, body) = app
        .send("POST", "/api/commands/users/deposit", Some(&token), Some(json!({ "amount": "1000000000000" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["amount"].is_string());
    assert_eq!(app.ledger.entry_count().await, 0);

    let (status, body) = app
        .send("GET", "/api/queries/users/transactions", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalBalance"], "99999999999999999.00");
}

#[tokio::test]
async fn test_register_duplicates() {
    let app = common::test_app();
    app.register_and_login("alice", "12345678901", "100").await;

    let (status, body) = app
        .send(
            "POST",
            "/api/commands/users/register",
            None,
            Some(json!({
                "fullName": "Other Alice",
                "nationalId": "10987654321",
                "login": "alice",
                "password": "secret123",
                "initialBalance": "10"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error_code"], "duplicate_login");

    let (status, body) = app
        .send(
            "POST",
            "/api/commands/users/register",
            None,
            Some(json!({
                "fullName": "Bob",
                "nationalId": "12345678901",
                "login": "bob",
                "password": "secret123",
                "initialBalance": "10"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error_code"], "duplicate_national_id");

    assert_eq!(app.ledger.list_accounts().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = common::test_app();
    app.register_and_login("alice", "12345678901", "100").await;

    let (wrong_status, wrong_body) = app
        .send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "login": "alice", "password": "not-the-password" })),
        )
        .await;
    let (unknown_status, unknown_body) = app
        .send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "login": "nobody", "password": "secret123" })),
        )
        .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body["error"], unknown_body["error"]);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = common::test_app();

    let (status, body) = app
        .send("POST", "/api/commands/users/deposit", None, Some(json!({ "amount": 10 })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_code"], "authentication_failed");

    let (status, _) = app
        .send("GET", "/api/queries/users/transactions", Some("garbage"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Signed with another secret
    let foreign = cqrs_banking::auth::JwtService::new("another-secret", 3600)
        .issue("alice")
        .unwrap();
    let (status, _) = app.send("GET", "/api/queries/users", Some(&foreign), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_debt_scenario_end_to_end() {
    let app = common::test_app();
    let token = app.register_and_login("alice", "12345678901", "200").await;

    let (status, body) = app
        .send("POST", "/api/commands/users/withdraw", Some(&token), Some(json!({ "amount": 300 })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["newBalance"], "-100.00");
    assert_eq!(body["transactionType"], "SAQUE");

    let (status, body) = app
        .send("POST", "/api/commands/users/deposit", Some(&token), Some(json!({ "amount": "200" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["newBalance"], "98.98");
    assert_eq!(body["transactionType"], "DEPOSITO");
    assert_eq!(body["message"], "Deposit completed successfully.");
    assert!(body["timestamp"].is_string());

    let (status, body) = app
        .send("POST", "/api/commands/users/payBill", Some(&token), Some(json!({ "amount": 8.98 })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["newBalance"], "90.00");
    assert_eq!(body["transactionType"], "PAGAMENTO");

    let (status, body) = app
        .send("GET", "/api/queries/users/transactions", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalBalance"], "90.00");

    let kinds: Vec<&str> = body["transactions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["type"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["pagamento", "deposito", "saque"]);
    assert_eq!(body["transactions"][0]["amount"], "8.98");

    // dd-MM-yyyy HH:mm:ss
    let date = body["transactions"][0]["date"].as_str().unwrap();
    assert_eq!(date.len(), 19);
    assert_eq!(&date[2..3], "-");
    assert_eq!(&date[10..11], " ");
}

#[tokio::test]
async fn test_amount_validation() {
    let app = common::test_app();
    let token = app.register_and_login("alice", "12345678901", "10").await;

    for bad in [json!({ "amount": 0.5 }), json!({ "amount": "1.234" }), json!({})] {
        let (status, body) = app
            .send("POST", "/api/commands/users/deposit", Some(&token), Some(bad))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["fields"]["amount"].is_string());
    }

    let (status, body) = app
        .send("POST", "/api/commands/users/deposit", Some(&token), Some(json!("not an object")))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "invalid_request");

    assert_eq!(app.ledger.entry_count().await, 0);
}

#[tokio::test]
async fn test_token_without_account_is_not_found() {
    let app = common::test_app();
    let token = app.jwt.issue("ghost").unwrap();

    let (status, body) = app
        .send("POST", "/api/commands/users/withdraw", Some(&token), Some(json!({ "amount": 10 })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], "account_not_found");
    assert_eq!(app.ledger.entry_count().await, 0);
}

#[tokio::test]
async fn test_cache_outage_keeps_commands_working() {
    let app = common::test_app();
    let token = app.register_and_login("alice", "12345678901", "50").await;
    app.cache.set_offline(true);

    let (status, body) = app
        .send("POST", "/api/commands/users/deposit", Some(&token), Some(json!({ "amount": 25 })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["newBalance"], "75.00");

    let (status, body) = app
        .send("GET", "/api/queries/users/transactions", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalBalance"], "75.00");
    assert_eq!(body["transactions"], json!([]));
}

#[tokio::test]
async fn test_account_queries() {
    let app = common::test_app();
    let token = app.register_and_login("alice", "12345678901", "10").await;
    app.register_and_login("bob", "10987654321", "20").await;

    let (status, body) = app.send("GET", "/api/queries/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let accounts = body.as_array().unwrap();
    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[0]["login"], "alice");
    assert_eq!(accounts[1]["login"], "bob");

    let bob_id = accounts[1]["id"].as_str().unwrap().to_string();
    let (status, body) = app
        .send("GET", &format!("/api/queries/users/{}", bob_id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], "20.00");

    let (status, body): (StatusCode, Value) = app
        .send("GET", &format!("/api/queries/users/{}", uuid::Uuid::new_v4()), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], "account_not_found");

    let (status, _) = app.send("GET", "/api/queries/users/not-a-uuid", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
