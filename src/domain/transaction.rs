//! Transaction kinds
//!
//! The recorded kind of a balance mutation. Wire names follow the
//! external contract (`DEPOSITO`, `SAQUE`, `PAGAMENTO`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a settled transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    #[serde(rename = "DEPOSITO")]
    Deposit,
    #[serde(rename = "SAQUE")]
    Withdrawal,
    #[serde(rename = "PAGAMENTO")]
    Payment,
}

impl TransactionKind {
    /// Wire/storage name
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "DEPOSITO",
            TransactionKind::Withdrawal => "SAQUE",
            TransactionKind::Payment => "PAGAMENTO",
        }
    }

    /// Human readable success message for command responses
    pub fn success_message(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "Deposit completed successfully.",
            TransactionKind::Withdrawal => "Withdrawal completed successfully.",
            TransactionKind::Payment => "Bill payment completed successfully.",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_string(&TransactionKind::Withdrawal).unwrap();
        assert_eq!(json, r#""SAQUE""#);

        let kind: TransactionKind = serde_json::from_str(r#""PAGAMENTO""#).unwrap();
        assert_eq!(kind, TransactionKind::Payment);
    }

    #[test]
    fn test_display_matches_wire_name() {
        for kind in [
            TransactionKind::Deposit,
            TransactionKind::Withdrawal,
            TransactionKind::Payment,
        ] {
            assert_eq!(serde_json::to_string(&kind).unwrap(), format!("\"{}\"", kind));
        }
    }
}
