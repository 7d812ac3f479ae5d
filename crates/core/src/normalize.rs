//! Locale-aware normalization of amounts and dates.
//!
//! Statement files and receipt text mix Venezuelan formatting ("21.070,56")
//! with US formatting ("21,070.56") and spreadsheet serial dates. Every
//! parser in the workspace funnels raw values through this module so the
//! disambiguation rules live in exactly one place.

use chrono::{Duration, NaiveDate};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Days between 1899-12-30 (spreadsheet day zero) and 1970-01-01.
const SERIAL_UNIX_EPOCH: f64 = 25569.0;

/// Date shapes accepted for free text, tried in order. Day-first — the
/// statements this is fed are Venezuelan.
const DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d", "%Y/%m/%d"];

/// Parse an amount written in either thousands convention.
///
/// Disambiguation, applied in order:
/// - both `.` and `,` present: the separator occurring last is the decimal
///   point, all earlier occurrences of either are grouping and are removed;
/// - only `,`, more than once: all but the last removed, the last becomes `.`;
/// - only `,`, once: it is the decimal point;
/// - only `.`: already canonical.
///
/// Currency markers (`Bs`, `$`) and spaces are tolerated. Returns `None` on
/// anything unparseable — never panics.
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let s = text.trim();
    let s = s.strip_prefix("Bs").unwrap_or(s);
    let s = s.strip_suffix("Bs").unwrap_or(s);
    let s: String = s.chars().filter(|c| !matches!(c, '$' | ' ')).collect();
    if s.is_empty() {
        return None;
    }

    let has_dot = s.contains('.');
    let has_comma = s.contains(',');

    let canonical: String = if has_dot && has_comma {
        let last = s.rfind(['.', ','])?;
        s.char_indices()
            .filter_map(|(i, c)| match c {
                '.' | ',' if i < last => None,
                '.' | ',' => Some('.'),
                other => Some(other),
            })
            .collect()
    } else if has_comma {
        let last = s.rfind(',')?;
        s.char_indices()
            .filter_map(|(i, c)| match c {
                ',' if i < last => None,
                ',' => Some('.'),
                other => Some(other),
            })
            .collect()
    } else {
        s
    };

    Decimal::from_str(&canonical).ok()
}

/// Pass-through for native numeric cells (spreadsheet floats).
pub fn amount_from_f64(value: f64) -> Option<Decimal> {
    Decimal::from_f64(value)
}

/// Convert a spreadsheet serial date (days since 1899-12-30) to a calendar
/// date. Fractional day parts (times) are truncated.
pub fn from_spreadsheet_serial(serial: f64) -> Option<NaiveDate> {
    let days = (serial - SERIAL_UNIX_EPOCH).floor() as i64;
    NaiveDate::from_ymd_opt(1970, 1, 1)?.checked_add_signed(Duration::days(days))
}

/// Parse a free-text date. `D/M/YYYY` and `D-M-YYYY` (day-first, one or two
/// digit components) take precedence, then ISO-like shapes. Unparseable text
/// is an explicit `None` — it is never passed through as-is.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let s = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}
