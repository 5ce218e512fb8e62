//! Command definitions
//!
//! Request payloads arrive unchecked and declare their field rules with
//! `validator`; [`CommandValidator`] turns them into the commands the
//! handlers execute.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::aggregate::{Account, BalanceChange};
use crate::domain::{
    Amount, AmountError, Balance, CommandValidator, TransactionKind, ValidationErrors, BALANCE_LIMIT,
    MONEY_SCALE,
};

/// Smallest amount accepted by deposit, withdraw and payBill
pub const MIN_OPERATION_AMOUNT: Decimal = Decimal::ONE;

/// National ids are exactly this many ASCII digits
pub const NATIONAL_ID_LENGTH: usize = 11;

fn rule_error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(rule_error("blank", "must not be blank"));
    }
    Ok(())
}

fn validate_national_id(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.len() != NATIONAL_ID_LENGTH || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(rule_error("national_id", "must contain exactly 11 digits"));
    }
    Ok(())
}

fn validate_initial_balance(value: &Decimal) -> Result<(), ValidationError> {
    if value.normalize().scale() > MONEY_SCALE {
        return Err(rule_error("scale", "must have at most 2 decimal places"));
    }
    if value.abs() >= BALANCE_LIMIT {
        return Err(rule_error("range", format!("must be below {}", BALANCE_LIMIT)));
    }
    Ok(())
}

fn validate_operation_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value < MIN_OPERATION_AMOUNT {
        return Err(rule_error("range", "must be at least 1"));
    }
    match Amount::new(*value) {
        Ok(_) => Ok(()),
        Err(AmountError::TooManyDecimals(_)) => {
            Err(rule_error("scale", "must have at most 2 decimal places"))
        }
        Err(other) => Err(rule_error("range", other.to_string())),
    }
}

/// Unwrap a field the declared rules already required
fn present<T>(value: Option<T>, field: &str) -> Result<T, ValidationErrors> {
    value.ok_or_else(|| {
        let mut errors = ValidationErrors::new();
        errors.add(field, "is required");
        errors
    })
}

// =========================================================================
// Register
// =========================================================================

/// Unchecked registration payload
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAccountRequest {
    #[validate(required(message = "is required"), custom(function = "validate_not_blank"))]
    pub full_name: Option<String>,
    #[validate(required(message = "is required"), custom(function = "validate_national_id"))]
    pub national_id: Option<String>,
    #[validate(required(message = "is required"), custom(function = "validate_not_blank"))]
    pub login: Option<String>,
    /// Not trimmed
    #[validate(
        required(message = "is required"),
        length(min = 6, message = "must be at least 6 characters")
    )]
    pub password: Option<String>,
    #[validate(required(message = "is required"), custom(function = "validate_initial_balance"))]
    pub initial_balance: Option<Decimal>,
}

/// Registration rules that come from configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegistrationPolicy {
    pub min_initial_balance: Decimal,
}

/// Validated registration command
#[derive(Clone)]
pub struct RegisterAccountCommand {
    pub full_name: String,
    pub national_id: String,
    pub login: String,
    pub password: String,
    pub initial_balance: Decimal,
}

impl std::fmt::Debug for RegisterAccountCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterAccountCommand")
            .field("full_name", &self.full_name)
            .field("national_id", &self.national_id)
            .field("login", &self.login)
            .field("password", &"***")
            .field("initial_balance", &self.initial_balance)
            .finish()
    }
}

impl CommandValidator for RegisterAccountRequest {
    type Context = RegistrationPolicy;
    type Validated = RegisterAccountCommand;

    fn check(&self, policy: &RegistrationPolicy, errors: &mut ValidationErrors) {
        if let Some(balance) = self.initial_balance {
            if balance < policy.min_initial_balance {
                errors.add(
                    "initialBalance",
                    format!("must be at least {}", policy.min_initial_balance),
                );
            }
        }
    }

    fn build(self) -> Result<RegisterAccountCommand, ValidationErrors> {
        Ok(RegisterAccountCommand {
            full_name: present(self.full_name, "fullName")?.trim().to_string(),
            national_id: present(self.national_id, "nationalId")?.trim().to_string(),
            login: present(self.login, "login")?.trim().to_string(),
            password: present(self.password, "password")?,
            initial_balance: present(self.initial_balance, "initialBalance")?,
        })
    }
}

/// Public view of an account. Never carries credential material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: Uuid,
    pub full_name: String,
    pub national_id: String,
    pub login: String,
    pub balance: Balance,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id(),
            full_name: account.full_name().to_string(),
            national_id: account.national_id().to_string(),
            login: account.login().to_string(),
            balance: *account.balance(),
        }
    }
}

// =========================================================================
// Deposit / Withdraw / PayBill
// =========================================================================

/// Unchecked `{amount}` payload shared by the balance commands
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AmountRequest {
    #[validate(required(message = "is required"), custom(function = "validate_operation_amount"))]
    pub amount: Option<Decimal>,
}

impl AmountRequest {
    pub fn new(amount: Decimal) -> Self {
        Self {
            amount: Some(amount),
        }
    }
}

impl CommandValidator for AmountRequest {
    type Context = ();
    type Validated = Amount;

    fn build(self) -> Result<Amount, ValidationErrors> {
        Amount::new(present(self.amount, "amount")?).map_err(|e| {
            let mut errors = ValidationErrors::new();
            errors.add("amount", e.to_string());
            errors
        })
    }
}

/// Balance command
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceCommand {
    pub kind: TransactionKind,
    pub amount: Amount,
}

impl BalanceCommand {
    pub fn deposit(amount: Amount) -> Self {
        Self {
            kind: TransactionKind::Deposit,
            amount,
        }
    }

    pub fn withdraw(amount: Amount) -> Self {
        Self {
            kind: TransactionKind::Withdrawal,
            amount,
        }
    }

    pub fn pay_bill(amount: Amount) -> Self {
        Self {
            kind: TransactionKind::Payment,
            amount,
        }
    }
}

/// Result of a balance command
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    pub message: String,
    pub new_balance: Balance,
    pub timestamp: DateTime<Utc>,
    pub transaction_type: TransactionKind,
}

impl From<&BalanceChange> for CommandResult {
    fn from(change: &BalanceChange) -> Self {
        Self {
            message: change.kind.success_message().to_string(),
            new_balance: change.new_balance,
            timestamp: change.occurred_at,
            transaction_type: change.kind,
        }
    }
}

// =========================================================================
// Login
// =========================================================================

/// Unchecked login payload
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(required(message = "is required"), custom(function = "validate_not_blank"))]
    pub login: Option<String>,
    #[validate(required(message = "is required"), length(min = 1, message = "must not be blank"))]
    pub password: Option<String>,
}

#[derive(Clone)]
pub struct LoginCommand {
    pub login: String,
    pub password: String,
}

impl std::fmt::Debug for LoginCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCommand")
            .field("login", &self.login)
            .field("password", &"***")
            .finish()
    }
}

impl CommandValidator for LoginRequest {
    type Context = ();
    type Validated = LoginCommand;

    fn build(self) -> Result<LoginCommand, ValidationErrors> {
        Ok(LoginCommand {
            login: present(self.login, "login")?.trim().to_string(),
            password: present(self.password, "password")?,
        })
    }
}

/// Issued bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResult {
    pub token: String,
}
