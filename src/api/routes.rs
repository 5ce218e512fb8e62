//! API Routes
//!
//! HTTP endpoint definitions. Handlers are built per request from the
//! shared [`AppState`]; all of them only hold `Arc`s.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Extension, Path, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::domain::{CommandValidator, OperationContext};
use crate::error::AppError;
use crate::handlers::{
    AccountView, AmountRequest, BalanceCommandHandler, CommandResult, LoginHandler, LoginRequest,
    LoginResult, RegisterAccountHandler, RegisterAccountRequest, RegistrationPolicy,
};
use crate::projection::{AccountQueryService, HistoryProjector, HistoryView};
use crate::state::AppState;

/// Unwrap a JSON body, mapping malformed payloads to a 400 in the common error shape
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))
}

fn balance_handler(state: &AppState) -> BalanceCommandHandler {
    BalanceCommandHandler::new(state.ledger.clone(), state.cache.clone(), state.cache_timeout)
}

// =========================================================================
// API Router
// =========================================================================

/// Routes reachable without a bearer token
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/commands/users/register", post(register))
}

/// Routes that require a bearer token
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        // Commands
        .route("/api/commands/users/deposit", post(deposit))
        .route("/api/commands/users/withdraw", post(withdraw))
        .route("/api/commands/users/payBill", post(pay_bill))
        // Queries
        .route("/api/queries/users/transactions", get(transactions))
        .route("/api/queries/users", get(list_accounts))
        .route("/api/queries/users/:id", get(get_account))
}

// =========================================================================
// Auth
// =========================================================================

/// POST /api/auth/login
async fn login(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResult>, AppError> {
    let command = json_body(payload)?.into_command(&())?;
    let handler = LoginHandler::new(state.ledger.clone(), state.jwt.clone());

    let result = handler.execute(command, &context).await?;
    Ok(Json(result))
}

// =========================================================================
// Commands
// =========================================================================

/// POST /api/commands/users/register
async fn register(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    payload: Result<Json<RegisterAccountRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AccountView>), AppError> {
    let policy = RegistrationPolicy {
        min_initial_balance: state.min_initial_balance,
    };
    let command = json_body(payload)?.into_command(&policy)?;
    let handler = RegisterAccountHandler::new(state.ledger.clone());

    let view = handler.execute(command, &context).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// POST /api/commands/users/deposit
async fn deposit(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    payload: Result<Json<AmountRequest>, JsonRejection>,
) -> Result<Json<CommandResult>, AppError> {
    let amount = json_body(payload)?.into_command(&())?;
    let result = balance_handler(&state).deposit(amount, &context).await?;
    Ok(Json(result))
}

/// POST /api/commands/users/withdraw
async fn withdraw(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    payload: Result<Json<AmountRequest>, JsonRejection>,
) -> Result<Json<CommandResult>, AppError> {
    let amount = json_body(payload)?.into_command(&())?;
    let result = balance_handler(&state).withdraw(amount, &context).await?;
    Ok(Json(result))
}

/// POST /api/commands/users/payBill
async fn pay_bill(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    payload: Result<Json<AmountRequest>, JsonRejection>,
) -> Result<Json<CommandResult>, AppError> {
    let amount = json_body(payload)?.into_command(&())?;
    let result = balance_handler(&state).pay_bill(amount, &context).await?;
    Ok(Json(result))
}

// =========================================================================
// Queries
// =========================================================================

/// GET /api/queries/users/transactions
async fn transactions(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
) -> Result<Json<HistoryView>, AppError> {
    let login = context.login()?;
    let projector = HistoryProjector::new(state.ledger.clone(), state.cache.clone(), state.cache_timeout);

    let view = projector.get_history(login).await?;
    Ok(Json(view))
}

/// GET /api/queries/users
async fn list_accounts(State(state): State<AppState>) -> Result<Json<Vec<AccountView>>, AppError> {
    let accounts = AccountQueryService::new(state.ledger.clone()).list_accounts().await?;
    Ok(Json(accounts))
}

/// GET /api/queries/users/:id
async fn get_account(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<AccountView>, AppError> {
    let Path(id) = id.map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))?;
    let account = AccountQueryService::new(state.ledger.clone()).get_account(id).await?;
    Ok(Json(account))
}
