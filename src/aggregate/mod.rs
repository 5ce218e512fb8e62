//! Aggregate module
//!
//! Account aggregate and the balance mutation rules.

pub mod account;

pub use account::{
    debit_balance, debt_interest, deposit_balance, Account, BalanceChange, NewAccount,
    DEBT_INTEREST_RATE,
};
