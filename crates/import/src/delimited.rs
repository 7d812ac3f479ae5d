//! Delimited text statements.
//!
//! The banks' text export wraps each movement in a single quoted field:
//!
//! ```text
//! "14/07/2025 CR TRANSFERENCIA 12345678901 1.500,00 21.070,56"
//! ```
//!
//! The reader unquotes each record and tests its first field against that
//! fixed shape — date, free-text description, amount, balance. Anything
//! else on the file (headers, totals, malformed lines) is skipped silently.

use cotejo_core::{normalize, TransactionKind, TransactionRecord};
use regex::Regex;
use std::sync::OnceLock;

use crate::StatementError;

fn re_shape() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| {
        Regex::new(r"^(\d{2}/\d{2}/\d{4})\s+(.*?)\s+([\d.,]+)\s+([\d.,]+)$").expect("invalid regex")
    })
}

/// These exports carry the reference as an 11-digit run inside the
/// description.
fn re_reference() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"\d{11}").expect("invalid regex"))
}

pub fn parse(bytes: &[u8]) -> Result<Vec<TransactionRecord>, StatementError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut records = Vec::new();
    for result in reader.records() {
        // A malformed record is a skipped line, not a failed statement.
        let Ok(record) = result else { continue };
        let Some(field) = record.get(0) else { continue };
        if let Some(tx) = parse_field(field.trim()) {
            records.push(tx);
        }
    }

    Ok(records)
}

fn parse_field(field: &str) -> Option<TransactionRecord> {
    let caps = re_shape().captures(field)?;

    let date = normalize::parse_date(&caps[1])?;
    let amount = normalize::parse_amount(&caps[3])?;
    let balance = normalize::parse_amount(&caps[4]);

    let description = caps[2].trim().to_string();
    let reference = re_reference()
        .find(&description)
        .map(|m| m.as_str().to_string());
    let kind = TransactionKind::from_description(&description);

    Some(TransactionRecord {
        date,
        description: (!description.is_empty()).then_some(description),
        amount,
        balance,
        kind: Some(kind),
        reference,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn quoted_export_line_is_extracted() {
        let data = b"\"14/07/2025 CR TRANSFERENCIA 12345678901 21.070,56 25.500,00\"\n";
        let records = parse(data).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2025, 7, 14).unwrap());
        assert_eq!(r.amount, Decimal::from_str("21070.56").unwrap());
        assert_eq!(r.balance, Some(Decimal::from_str("25500.00").unwrap()));
        assert_eq!(r.kind, Some(TransactionKind::Credit));
        assert_eq!(r.reference.as_deref(), Some("12345678901"));
        assert_eq!(
            r.description.as_deref(),
            Some("CR TRANSFERENCIA 12345678901")
        );
    }

    #[test]
    fn non_matching_lines_are_silently_skipped() {
        let data = b"Fecha;Detalle\n\
            resumen del mes\n\
            \"15/07/2025 PAGO SERVICIO CANTV 500,00 25.000,00\"\n\
            \"TOTAL 25.000,00\"\n";
        let records = parse(data).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].amount, Decimal::from_str("500.00").unwrap());
        assert_eq!(records[0].kind, Some(TransactionKind::Debit));
    }

    #[test]
    fn reference_must_be_eleven_digits() {
        let data = b"\"14/07/2025 TRANSFERENCIA 123456789 1.000,00 2.000,00\"\n";
        let records = parse(data).unwrap();
        assert_eq!(records[0].reference, None);
    }

    #[test]
    fn empty_input_yields_empty() {
        assert!(parse(b"").unwrap().is_empty());
    }

    #[test]
    fn single_digit_day_does_not_match_shape() {
        // The export always zero-pads; a stray 4/7/2025 line is not a movement.
        let data = b"\"4/7/2025 PAGO 1,00 2,00\"\n";
        assert!(parse(data).unwrap().is_empty());
    }
}
