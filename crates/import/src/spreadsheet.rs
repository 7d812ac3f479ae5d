//! Tabular spreadsheet statements (XLSX / XLS).
//!
//! Layout expected from the banks' exports: row 0 is a header, data rows
//! carry date / description / amount / optional balance in the first four
//! columns. Rows that do not normalize are dropped silently.

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use cotejo_core::{normalize, TransactionKind, TransactionRecord};
use regex::Regex;
use rust_decimal::Decimal;
use std::io::Cursor;
use std::sync::OnceLock;

use crate::{StatementError, StatementFormat};

/// First run of 7 or more consecutive digits in a description — the bank's
/// reference number when present.
fn re_reference() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"\d{7,}").expect("invalid regex"))
}

pub fn parse(bytes: &[u8]) -> Result<Vec<TransactionRecord>, StatementError> {
    let parse_err = |message: String| StatementError::Parse {
        format: StatementFormat::Spreadsheet,
        message,
    };

    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| parse_err(e.to_string()))?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| parse_err("workbook has no sheets".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| parse_err(e.to_string()))?;

    // Row 0 is the header.
    Ok(parse_rows(range.rows().skip(1)))
}

/// Walk data rows into records. Exposed separately from the workbook I/O so
/// the row semantics are testable without an XLSX fixture.
fn parse_rows<'a>(rows: impl Iterator<Item = &'a [Data]>) -> Vec<TransactionRecord> {
    let mut records = Vec::new();

    for row in rows {
        // Need at least date, description, amount.
        if row.len() < 3 {
            continue;
        }

        let (Some(date), Some(amount)) = (cell_date(&row[0]), cell_amount(&row[2])) else {
            tracing::debug!("discarding spreadsheet row without normalizable date/amount");
            continue;
        };

        let description = cell_text(&row[1]);
        let reference = description
            .as_deref()
            .and_then(|d| re_reference().find(d))
            .map(|m| m.as_str().to_string());
        let kind = description.as_deref().map(TransactionKind::from_description);
        let balance = row.get(3).and_then(cell_amount);

        records.push(TransactionRecord {
            date,
            description,
            amount,
            balance,
            kind,
            reference,
        });
    }

    records
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        other => {
            let text = other.to_string().trim().to_string();
            (!text.is_empty()).then_some(text)
        }
    }
}

fn cell_amount(cell: &Data) -> Option<Decimal> {
    match cell {
        Data::Float(f) => normalize::amount_from_f64(*f),
        Data::Int(i) => Some(Decimal::from(*i)),
        Data::String(s) => normalize::parse_amount(s),
        _ => None,
    }
}

fn cell_date(cell: &Data) -> Option<chrono::NaiveDate> {
    match cell {
        Data::Float(serial) => normalize::from_spreadsheet_serial(*serial),
        Data::Int(serial) => normalize::from_spreadsheet_serial(*serial as f64),
        Data::DateTime(dt) => normalize::from_spreadsheet_serial(dt.as_f64()),
        Data::String(s) => normalize::parse_date(s),
        _ => None,
    }
}
