//! cqrs_banking Library
//!
//! Banking backend with separated command and query paths: commands settle
//! against the ledger, queries read the balance plus a bounded
//! recent-activity cache.

pub mod aggregate;
pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod ledger;
pub mod projection;
pub mod state;

mod error;

pub use config::Config;
pub use error::{AppError, ErrorResponse};
pub use domain::{Amount, AmountError, Balance, DomainError, OperationContext, TransactionKind};
pub use state::AppState;
