//! Ledger module
//!
//! Durable accounts and append-only ledger entries: the system of record
//! for balances.

mod error;
mod memory;
mod postgres;
mod repository;

pub use error::LedgerError;
pub use memory::{InMemoryLedgerRepository, InMemoryLedgerTransaction};
pub use postgres::{PgLedgerRepository, PgLedgerTransaction};
pub use repository::{LedgerEntry, LedgerRepository, LedgerTransaction};
