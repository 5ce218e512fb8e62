//! Amount and Balance types
//!
//! Domain primitives for monetary values. Every value that leaves this module
//! carries exactly two fractional digits.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum allowed amount for a single operation (1 trillion)
const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Monetary scale (2 fractional digits)
pub const MONEY_SCALE: u32 = 2;

/// Exclusive bound on a balance's magnitude (10^17, what NUMERIC(19,2) holds)
pub const BALANCE_LIMIT: Decimal = Decimal::from_parts(1_569_325_056, 23_283_064, 0, false, 0);

/// Round a decimal to the monetary scale using half-up rounding.
///
/// The result always has exactly [`MONEY_SCALE`] fractional digits and never
/// carries a negative zero.
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        return Decimal::new(0, MONEY_SCALE);
    }
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Amount represents a validated, positive operation value.
///
/// # Invariants
/// - Value is always positive (> 0)
/// - At most 2 decimal places (stored with exactly 2)
/// - Maximum value is 1 trillion
///
/// # Example
/// ```
/// use rust_decimal::Decimal;
/// use cqrs_banking::domain::Amount;
///
/// let amount = Amount::new(Decimal::new(1050, 1)).unwrap();
/// assert_eq!(amount.to_string(), "105.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

/// Errors that can occur when creating an Amount
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Amount must be positive (got {0})")]
    NotPositive(Decimal),

    #[error("Amount has too many decimal places (max {MONEY_SCALE}, got {0})")]
    TooManyDecimals(u32),

    #[error("Amount exceeds maximum allowed value ({MAX_AMOUNT})")]
    Overflow,

    #[error("Invalid amount format: {0}")]
    ParseError(String),
}

impl Amount {
    /// Create a new Amount with validation.
    ///
    /// # Errors
    /// - `AmountError::NotPositive` if value <= 0
    /// - `AmountError::TooManyDecimals` if more than 2 significant decimal places
    /// - `AmountError::Overflow` if value > 1 trillion
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value <= Decimal::ZERO {
            return Err(AmountError::NotPositive(value));
        }

        // 10.500 is fine, 10.505 is not
        let significant_scale = value.normalize().scale();
        if significant_scale > MONEY_SCALE {
            return Err(AmountError::TooManyDecimals(significant_scale));
        }

        if value > MAX_AMOUNT {
            return Err(AmountError::Overflow);
        }

        Ok(Self(round_money(value)))
    }

    /// Get the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s).map_err(|e| AmountError::ParseError(e.to_string()))?;
        Amount::new(decimal)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// Balance represents an account balance.
///
/// Unlike Amount, a Balance may be zero or negative: a negative balance is
/// an interest-bearing debt, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "Decimal", into = "Decimal")]
pub struct Balance(Decimal);

impl Balance {
    /// Create a balance, rounding half-up to 2 decimal places
    pub fn new(value: Decimal) -> Self {
        Self(round_money(value))
    }

    /// Rounded balance, or `None` when its magnitude reaches [`BALANCE_LIMIT`]
    pub fn checked_new(value: Decimal) -> Option<Self> {
        if value.abs() >= BALANCE_LIMIT {
            return None;
        }
        let balance = Self::new(value);
        (balance.0.abs() < BALANCE_LIMIT).then_some(balance)
    }

    /// Create a zero balance
    pub fn zero() -> Self {
        Self(round_money(Decimal::ZERO))
    }

    /// Get the underlying value
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Whether the account is in debt
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }
}

impl From<Decimal> for Balance {
    fn from(value: Decimal) -> Self {
        Balance::new(value)
    }
}

impl From<Balance> for Decimal {
    fn from(balance: Balance) -> Self {
        balance.0
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for Balance {
    fn default() -> Self {
        Self::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_positive() {
        let amount = Amount::new(dec!(100)).unwrap();
        assert_eq!(amount.value(), dec!(100.00));
        assert_eq!(amount.to_string(), "100.00");
    }

    #[test]
    fn test_amount_zero_rejected() {
        let amount = Amount::new(Decimal::ZERO);
        assert!(matches!(amount, Err(AmountError::NotPositive(_))));
    }

    #[test]
    fn test_amount_negative_rejected() {
        let amount = Amount::new(dec!(-5));
        assert!(matches!(amount, Err(AmountError::NotPositive(_))));
    }

    #[test]
    fn test_amount_too_many_decimals() {
        let amount = Amount::new(dec!(10.505));
        assert!(matches!(amount, Err(AmountError::TooManyDecimals(3))));
    }

    #[test]
    fn test_amount_trailing_zeros_ok() {
        let amount = Amount::new(dec!(10.500)).unwrap();
        assert_eq!(amount.to_string(), "10.50");
    }

    #[test]
    fn test_amount_overflow() {
        assert_eq!(MAX_AMOUNT, dec!(1000000000000));
        let amount = Amount::new(dec!(1000000000000.01));
        assert!(matches!(amount, Err(AmountError::Overflow)));
    }

    #[test]
    fn test_amount_from_str() {
        let amount: Amount = "123.4".parse().unwrap();
        assert_eq!(amount.value(), dec!(123.40));

        let bad: Result<Amount, _> = "abc".parse();
        assert!(matches!(bad, Err(AmountError::ParseError(_))));
    }

    #[test]
    fn test_amount_deserialize_number_and_string() {
        let from_number: Amount = serde_json::from_str("50.5").unwrap();
        let from_string: Amount = serde_json::from_str("\"50.5\"").unwrap();
        assert_eq!(from_number, from_string);

        let rejected: Result<Amount, _> = serde_json::from_str("0");
        assert!(rejected.is_err());
    }

    #[test]
    fn test_round_money_half_up() {
        assert_eq!(round_money(dec!(1.005)).to_string(), "1.01");
        assert_eq!(round_money(dec!(-1.005)).to_string(), "-1.01");
        assert_eq!(round_money(dec!(1.004)).to_string(), "1.00");
        assert_eq!(round_money(dec!(7)).to_string(), "7.00");
    }

    #[test]
    fn test_balance_never_negative_zero() {
        let balance = Balance::new(dec!(-0.001));
        assert_eq!(balance.to_string(), "0.00");
        assert!(!balance.is_negative());
    }

    #[test]
    fn test_balance_checked_range() {
        assert_eq!(BALANCE_LIMIT, dec!(100000000000000000));
        assert!(Balance::checked_new(dec!(99999999999999999.99)).is_some());
        assert!(Balance::checked_new(dec!(-99999999999999999.99)).is_some());
        assert!(Balance::checked_new(dec!(100000000000000000)).is_none());
        assert!(Balance::checked_new(dec!(99999999999999999.995)).is_none());
        assert!(Balance::checked_new(Decimal::MAX).is_none());
    }

    #[test]
    fn test_balance_negative() {
        let balance = Balance::new(dec!(-300));
        assert!(balance.is_negative());
        assert_eq!(balance.to_string(), "-300.00");
    }
}
