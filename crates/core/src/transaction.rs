use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a statement line item, derived from the bank's description
/// prefix at extraction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Credit,
    Debit,
}

impl TransactionKind {
    /// Venezuelan statement exports mark credits with a literal `CR` prefix
    /// on the description; everything else is a debit.
    pub fn from_description(description: &str) -> Self {
        if description.starts_with("CR") {
            TransactionKind::Credit
        } else {
            TransactionKind::Debit
        }
    }
}

/// One normalized line item from a bank statement.
///
/// Produced only by the statement extractor and immutable afterwards. `date`
/// and `amount` are always present — rows that fail either normalization are
/// discarded before a record is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub date: NaiveDate,
    pub description: Option<String>,
    pub amount: Decimal,
    pub balance: Option<Decimal>,
    pub kind: Option<TransactionKind>,
    pub reference: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn kind_from_cr_prefix() {
        assert_eq!(
            TransactionKind::from_description("CR TRANSFERENCIA 123456789"),
            TransactionKind::Credit
        );
        assert_eq!(
            TransactionKind::from_description("PAGO SERVICIO CANTV"),
            TransactionKind::Debit
        );
        // Prefix must be leading, not anywhere in the text.
        assert_eq!(
            TransactionKind::from_description("PAGO CR ELECTRONICO"),
            TransactionKind::Debit
        );
    }

    #[test]
    fn kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TransactionKind::Credit).unwrap(),
            "\"credit\""
        );
    }

    #[test]
    fn record_round_trips_through_json() {
        let record = TransactionRecord {
            date: NaiveDate::from_ymd_opt(2025, 7, 14).unwrap(),
            description: Some("CR TRANSFERENCIA 12345678901".to_string()),
            amount: Decimal::from_str("21070.56").unwrap(),
            balance: None,
            kind: Some(TransactionKind::Credit),
            reference: Some("12345678901".to_string()),
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: TransactionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
