//! PostgreSQL Ledger Repository
//!
//! Accounts and ledger entries in Postgres. Balance mutations lock the
//! account row with `SELECT ... FOR UPDATE` inside a transaction; the new
//! balance and the ledger insert commit together.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::aggregate::{Account, BalanceChange};

use super::{LedgerEntry, LedgerError, LedgerRepository, LedgerTransaction};

/// Unique constraint names (must match migrations/0001_init.sql)
const LOGIN_CONSTRAINT: &str = "uq_accounts_login";
const NATIONAL_ID_CONSTRAINT: &str = "uq_accounts_national_id";

type AccountRow = (Uuid, String, String, String, String, Decimal, DateTime<Utc>);

fn account_from_row(row: AccountRow) -> Account {
    let (id, full_name, national_id, login, password_hash, balance, created_at) = row;
    Account::from_storage(id, full_name, national_id, login, password_hash, balance, created_at)
}

/// Translate unique-index violations into domain conflicts
fn map_insert_error(error: sqlx::Error, account: &Account) -> LedgerError {
    if let sqlx::Error::Database(db_error) = &error {
        match db_error.constraint() {
            Some(LOGIN_CONSTRAINT) => return LedgerError::DuplicateLogin(account.login().to_string()),
            Some(NATIONAL_ID_CONSTRAINT) => {
                return LedgerError::DuplicateNationalId(account.national_id().to_string())
            }
            _ => {}
        }
    }
    LedgerError::Database(error)
}

/// Postgres-backed ledger
#[derive(Debug, Clone)]
pub struct PgLedgerRepository {
    pool: PgPool,
}

impl PgLedgerRepository {
    /// Create a new repository with a database pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerRepository for PgLedgerRepository {
    async fn find_by_login(&self, login: &str) -> Result<Option<Account>, LedgerError> {
        let row: Option<AccountRow> = sqlx::query_as(
            r#"
            SELECT id, full_name, national_id, login, password_hash, balance, created_at
            FROM accounts
            WHERE login = $1
            "#,
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(account_from_row))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, LedgerError> {
        let row: Option<AccountRow> = sqlx::query_as(
            r#"
            SELECT id, full_name, national_id, login, password_hash, balance, created_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(account_from_row))
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, LedgerError> {
        let rows: Vec<AccountRow> = sqlx::query_as(
            r#"
            SELECT id, full_name, national_id, login, password_hash, balance, created_at
            FROM accounts
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(account_from_row).collect())
    }

    async fn exists_by_login(&self, login: &str) -> Result<bool, LedgerError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM accounts WHERE login = $1)")
            .bind(login)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn exists_by_national_id(&self, national_id: &str) -> Result<bool, LedgerError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM accounts WHERE national_id = $1)")
                .bind(national_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn insert_account(&self, account: &Account) -> Result<(), LedgerError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, full_name, national_id, login, password_hash, balance, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(account.id())
        .bind(account.full_name())
        .bind(account.national_id())
        .bind(account.login())
        .bind(account.password_hash())
        .bind(account.balance().value())
        .bind(account.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, account))?;

        Ok(())
    }

    async fn begin(&self, login: &str) -> Result<Box<dyn LedgerTransaction>, LedgerError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<AccountRow> = sqlx::query_as(
            r#"
            SELECT id, full_name, national_id, login, password_hash, balance, created_at
            FROM accounts
            WHERE login = $1
            FOR UPDATE
            "#,
        )
        .bind(login)
        .fetch_optional(&mut *tx)
        .await?;

        // Dropping tx here rolls back
        let account = row
            .map(account_from_row)
            .ok_or_else(|| LedgerError::AccountNotFound(login.to_string()))?;

        Ok(Box::new(PgLedgerTransaction { tx, account }))
    }
}

/// Open Postgres transaction with the account row locked
pub struct PgLedgerTransaction {
    tx: Transaction<'static, Postgres>,
    account: Account,
}

#[async_trait]
impl LedgerTransaction for PgLedgerTransaction {
    fn account(&self) -> &Account {
        &self.account
    }

    async fn commit(self: Box<Self>, change: &BalanceChange) -> Result<LedgerEntry, LedgerError> {
        let PgLedgerTransaction { mut tx, account } = *self;
        let entry = LedgerEntry::from_change(change);

        sqlx::query(
            r#"
            UPDATE accounts
            SET balance = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(account.id())
        .bind(change.new_balance.value())
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO ledger_entries (id, account_id, kind, amount, occurred_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(entry.id)
        .bind(entry.account_id)
        .bind(entry.kind.as_str())
        .bind(entry.amount.value())
        .bind(entry.occurred_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            account_id = %account.id(),
            kind = %entry.kind,
            amount = %entry.amount,
            new_balance = %change.new_balance,
            "Ledger entry committed"
        );

        Ok(entry)
    }
}
