//! Projection module
//!
//! Read side. Queries never take locks and never write; the history view
//! combines the authoritative balance with the recent-activity cache.

mod accounts;
mod history;

pub use accounts::AccountQueryService;
pub use history::{HistoryProjector, HistoryView, TransactionView, HISTORY_DATE_FORMAT};
