//! Statement transaction extraction.
//!
//! Turns an uploaded account statement — XLSX/XLS spreadsheet, PDF, or the
//! banks' quoted delimited-text export — into normalized
//! [`TransactionRecord`]s. Individual rows or lines that do not look like
//! transactions are skipped, not errors; only an unreadable file or an
//! undeclared format fails the extraction.

pub mod delimited;
pub mod pdf;
pub mod spreadsheet;

use cotejo_core::TransactionRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatementError {
    #[error("unsupported statement format: {0}")]
    UnsupportedFormat(String),
    #[error("could not parse {format} statement: {message}")]
    Parse {
        format: StatementFormat,
        message: String,
    },
}

/// Declared format of an uploaded statement file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementFormat {
    Spreadsheet,
    Pdf,
    Delimited,
}

impl fmt::Display for StatementFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementFormat::Spreadsheet => write!(f, "spreadsheet"),
            StatementFormat::Pdf => write!(f, "pdf"),
            StatementFormat::Delimited => write!(f, "delimited"),
        }
    }
}

impl StatementFormat {
    /// Map the MIME type declared at upload time. Unknown `text/*` subtypes
    /// are treated as delimited exports; anything else is unsupported.
    pub fn from_mime(mime: &str) -> Result<Self, StatementError> {
        match mime {
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            | "application/vnd.ms-excel" => Ok(StatementFormat::Spreadsheet),
            "application/pdf" => Ok(StatementFormat::Pdf),
            "text/csv" => Ok(StatementFormat::Delimited),
            other if other.starts_with("text/") => Ok(StatementFormat::Delimited),
            other => Err(StatementError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Extract transaction records from raw statement bytes.
///
/// An empty result is valid (a statement with no recognizable rows) and is
/// surfaced to the caller as a warning rather than an error.
pub fn extract_transactions(
    bytes: &[u8],
    format: StatementFormat,
) -> Result<Vec<TransactionRecord>, StatementError> {
    let records = match format {
        StatementFormat::Spreadsheet => spreadsheet::parse(bytes)?,
        StatementFormat::Pdf => pdf::parse(bytes)?,
        StatementFormat::Delimited => delimited::parse(bytes)?,
    };

    if records.is_empty() {
        tracing::warn!(%format, "statement parsed but yielded no transactions");
    } else {
        tracing::debug!(%format, count = records.len(), "extracted statement transactions");
    }

    Ok(records)
}
