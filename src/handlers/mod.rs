//! Command Handlers module
//!
//! CQRS command side. Each handler validates nothing itself: it receives an
//! already-validated command plus the caller's [`OperationContext`] and
//! coordinates the ledger, the cache and authentication.
//!
//! [`OperationContext`]: crate::domain::OperationContext

mod balance_handler;
mod commands;
mod login_handler;
mod register_handler;


pub use balance_handler::BalanceCommandHandler;
pub use commands::*;
pub use login_handler::LoginHandler;
pub use register_handler::RegisterAccountHandler;
