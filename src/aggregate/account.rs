//! Account Aggregate
//!
//! Holds the balance mutation rules. Commands compute a [`BalanceChange`]
//! without touching state; the change is persisted by the ledger and then
//! applied to the in-memory account.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use uuid::Uuid;

use crate::domain::{round_money, Amount, Balance, DomainError, TransactionKind};

/// Interest charged on outstanding debt, once per deposit (1.02%)
pub const DEBT_INTEREST_RATE: Decimal = Decimal::from_parts(102, 0, 0, false, 4);

/// Account Aggregate
#[derive(Clone)]
pub struct Account {
    id: Uuid,
    full_name: String,
    national_id: String,
    login: String,
    /// PHC-formatted password hash
    password_hash: String,
    balance: Balance,
    created_at: DateTime<Utc>,
}

/// Fields required to open a new account
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub full_name: String,
    pub national_id: String,
    pub login: String,
    pub password_hash: String,
    pub initial_balance: Balance,
}

/// Outcome of a balance mutation, computed before persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceChange {
    pub account_id: Uuid,
    pub kind: TransactionKind,
    pub amount: Amount,
    pub previous_balance: Balance,
    pub new_balance: Balance,
    /// Debt interest charged by this mutation (zero unless a deposit hit debt)
    pub interest: Decimal,
    pub occurred_at: DateTime<Utc>,
}

/// Interest owed on a balance: `round(|B| * 1.02%, 2)` when `B < 0`, else zero.
pub fn debt_interest(balance: &Balance) -> Decimal {
    if !balance.is_negative() {
        return round_money(Decimal::ZERO);
    }
    round_money(balance.value().abs() * DEBT_INTEREST_RATE)
}

/// New balance after depositing `amount` onto `balance`.
///
/// In debt, one interest charge accrues on the existing debt; the deposit
/// pays debt plus interest first and any excess becomes positive balance.
/// Returns `(new_balance, interest_charged)`.
///
/// # Errors
/// `BalanceOutOfRange` when the result cannot be stored.
pub fn deposit_balance(balance: &Balance, amount: &Amount) -> Result<(Balance, Decimal), DomainError> {
    let current = balance.value();
    let deposit = amount.value();

    if !balance.is_negative() {
        let new_balance = checked_balance(current.checked_add(deposit))?;
        return Ok((new_balance, round_money(Decimal::ZERO)));
    }

    let debt = current.abs();
    let interest = debt_interest(balance);
    let total_owed = debt + interest;

    // applied <= debt + interest, so this never exceeds zero
    let applied = deposit.min(total_owed);
    let settled = current + applied - interest;

    let remainder = deposit - applied;
    let new_balance = checked_balance(settled.checked_add(remainder))?;

    Ok((new_balance, interest))
}

/// New balance after a withdrawal or bill payment. Negative results are allowed.
///
/// # Errors
/// `BalanceOutOfRange` when the result cannot be stored.
pub fn debit_balance(balance: &Balance, amount: &Amount) -> Result<Balance, DomainError> {
    checked_balance(balance.value().checked_sub(amount.value()))
}

fn checked_balance(value: Option<Decimal>) -> Result<Balance, DomainError> {
    value
        .and_then(Balance::checked_new)
        .ok_or(DomainError::BalanceOutOfRange)
}

impl Account {
    /// Build a brand new account (id and creation time assigned here)
    pub fn create(new_account: NewAccount) -> Self {
        Self {
            id: Uuid::new_v4(),
            full_name: new_account.full_name,
            national_id: new_account.national_id,
            login: new_account.login,
            password_hash: new_account.password_hash,
            balance: new_account.initial_balance,
            created_at: Utc::now(),
        }
    }

    /// Rehydrate an account from storage
    pub fn from_storage(
        id: Uuid,
        full_name: String,
        national_id: String,
        login: String,
        password_hash: String,
        balance: Decimal,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            full_name,
            national_id,
            login,
            password_hash,
            balance: Balance::new(balance),
            created_at,
        }
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Deposit money, settling debt and interest first
    pub fn deposit(&self, amount: &Amount) -> Result<BalanceChange, DomainError> {
        let (new_balance, interest) = deposit_balance(&self.balance, amount)?;
        Ok(self.change(TransactionKind::Deposit, amount, new_balance, interest))
    }

    /// Withdraw money; the balance may go negative
    pub fn withdraw(&self, amount: &Amount) -> Result<BalanceChange, DomainError> {
        let new_balance = debit_balance(&self.balance, amount)?;
        Ok(self.change(TransactionKind::Withdrawal, amount, new_balance, Decimal::ZERO))
    }

    /// Pay a bill; same arithmetic as a withdrawal, recorded as PAYMENT
    pub fn pay_bill(&self, amount: &Amount) -> Result<BalanceChange, DomainError> {
        let new_balance = debit_balance(&self.balance, amount)?;
        Ok(self.change(TransactionKind::Payment, amount, new_balance, Decimal::ZERO))
    }

    /// Dispatch on transaction kind
    pub fn settle(&self, kind: TransactionKind, amount: &Amount) -> Result<BalanceChange, DomainError> {
        match kind {
            TransactionKind::Deposit => self.deposit(amount),
            TransactionKind::Withdrawal => self.withdraw(amount),
            TransactionKind::Payment => self.pay_bill(amount),
        }
    }

    fn change(
        &self,
        kind: TransactionKind,
        amount: &Amount,
        new_balance: Balance,
        interest: Decimal,
    ) -> BalanceChange {
        BalanceChange {
            account_id: self.id,
            kind,
            amount: *amount,
            previous_balance: self.balance,
            new_balance,
            interest: round_money(interest),
            occurred_at: Utc::now(),
        }
    }

    /// Apply a persisted change
    pub fn apply(mut self, change: &BalanceChange) -> Self {
        debug_assert_eq!(change.account_id, self.id);
        self.balance = change.new_balance;
        self
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn national_id(&self) -> &str {
        &self.national_id
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn balance(&self) -> &Balance {
        &self.balance
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("login", &self.login)
            .field("national_id", &self.national_id)
            .field("balance", &self.balance)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}
