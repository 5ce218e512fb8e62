//! Domain module
//!
//! Core domain types and business logic.

pub mod amount;
pub mod context;
pub mod error;
pub mod transaction;
pub mod validation;

pub use amount::{round_money, Amount, AmountError, Balance, BALANCE_LIMIT, MONEY_SCALE};
pub use context::{AuthenticatedPrincipal, OperationContext};
pub use error::DomainError;
pub use transaction::TransactionKind;
pub use validation::{CommandValidator, ValidationErrors};
