//! PDF statements.
//!
//! PDFs carry no cell structure, so extraction is a line scan over the
//! document text: a line is a transaction iff it shows both a date-shaped
//! and an amount-shaped substring. Amounts on these layouts use US grouping
//! (`1,500.00`), so thousands commas are stripped rather than run through
//! the locale disambiguation.

use cotejo_core::{normalize, TransactionRecord};
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::{StatementError, StatementFormat};

fn re_date() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| {
        Regex::new(r"\d{1,2}/\d{1,2}/\d{4}|\d{1,2}-\d{1,2}-\d{4}|\d{4}-\d{1,2}-\d{1,2}")
            .expect("invalid regex")
    })
}

fn re_amount() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"\d{1,3}(?:,\d{3})*(?:\.\d{2})?").expect("invalid regex"))
}

pub fn parse(bytes: &[u8]) -> Result<Vec<TransactionRecord>, StatementError> {
    let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| StatementError::Parse {
        format: StatementFormat::Pdf,
        message: e.to_string(),
    })?;
    Ok(parse_text(&text))
}

/// Scan already-extracted document text. Public because callers sometimes
/// hold the text layer from an earlier pass.
pub fn parse_text(text: &str) -> Vec<TransactionRecord> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> Option<TransactionRecord> {
    let date_match = re_date().find(line)?;
    let date = normalize::parse_date(date_match.as_str())?;

    // Digit runs inside the date would read as amounts, so scan the line
    // with the date removed.
    let mut rest = String::with_capacity(line.len());
    rest.push_str(&line[..date_match.start()]);
    rest.push_str(&line[date_match.end()..]);

    let mut amounts = re_amount().find_iter(&rest);
    let first = amounts.next()?;
    let amount = grouped_amount(first.as_str())?;
    let balance = amounts.next().and_then(|m| grouped_amount(m.as_str()));

    // Description is the line minus the date and the first amount; the
    // balance figure, when present, stays in the text.
    let mut description = String::with_capacity(rest.len());
    description.push_str(&rest[..first.start()]);
    description.push_str(&rest[first.end()..]);
    let description = description.trim().to_string();

    Some(TransactionRecord {
        date,
        description: (!description.is_empty()).then_some(description),
        amount,
        balance,
        kind: None,
        reference: None,
    })
}

fn grouped_amount(text: &str) -> Option<Decimal> {
    Decimal::from_str(&text.replace(',', "")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn transaction_line_is_extracted() {
        let text = "ESTADO DE CUENTA\n\
                    14/07/2025 TRANSFERENCIA RECIBIDA 789.00 10,789.00\n\
                    Página 1 de 2";
        let records = parse_text(text);
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2025, 7, 14).unwrap());
        assert_eq!(r.amount, Decimal::from(789));
        assert_eq!(r.balance, Some(Decimal::from(10789)));
        assert!(r.description.as_deref().unwrap().contains("TRANSFERENCIA"));
    }

    #[test]
    fn iso_dates_are_accepted() {
        let records = parse_text("2025-07-14 PAGO NOMINA 1,500.00");
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].date,
            NaiveDate::from_ymd_opt(2025, 7, 14).unwrap()
        );
        assert_eq!(records[0].amount, Decimal::from(1500));
    }

    #[test]
    fn line_without_amount_is_skipped() {
        assert!(parse_text("14/07/2025 SALDO ANTERIOR").is_empty());
    }

    #[test]
    fn line_without_date_is_skipped() {
        assert!(parse_text("TRANSFERENCIA RECIBIDA 789.00").is_empty());
    }

    #[test]
    fn single_amount_means_no_balance() {
        let records = parse_text("14/07/2025 COMISION 3.72");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].balance, None);
    }

    #[test]
    fn pdf_rows_carry_no_kind_or_reference() {
        let records = parse_text("14/07/2025 CR ABONO 789.00");
        assert_eq!(records[0].kind, None);
        assert_eq!(records[0].reference, None);
    }

    #[test]
    fn garbage_bytes_are_a_parse_error() {
        let err = parse(b"not a pdf at all").unwrap_err();
        assert!(matches!(
            err,
            StatementError::Parse {
                format: StatementFormat::Pdf,
                ..
            }
        ));
    }
}
