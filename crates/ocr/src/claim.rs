//! Payment-claim extraction from recognized receipt text.
//!
//! Receipts are free-form and the OCR layer is noisy, so extraction is a
//! chain of per-field rules applied line by line: each rule is a keyword
//! predicate plus a pattern extractor, and the first line that satisfies a
//! field's rule wins — later lines never overwrite an extracted field. The
//! amount is the exception: it is searched over the whole text, because
//! receipts place it anywhere, and the largest value found wins (smaller
//! numbers are almost always masked account fragments or fee lines).

use regex::Regex;
use rust_decimal::Decimal;
use std::sync::OnceLock;

use cotejo_core::{normalize, PaymentClaim};

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

// `[/|-]` tolerates the pipe Tesseract sometimes reads a slash as.
re!(re_date, r"\d{1,2}[/|-]\d{1,2}[/|-]\d{4}");
re!(re_reference,
    r"(?i)(?:referencia|ref|trx|operación|operacion)[:\s]*(\d{7,14})");
re!(re_bank_code, r"(?i)\d{4}\s*-\s*([A-Z\s]+)");
re!(re_bank_name, r"(?i)(?:banco[:\s]*)?([a-zA-Z\s]+)");
re!(re_bank_fragment,
    r"(?i)banesco|mercantil|venezuela|bancaribe|provincial|bbva|bdc");
re!(re_account_full, r"\d{4}[-\s]?\d{4}[-\s]?\d{2}[-\s]?\d{10}");
re!(re_account_masked, r"\d{4}\*{4}\d{4}");
re!(re_account_phone, r"\d{11}");
re!(re_concept, r"(?i)concepto[:\s]*(.+)");
re!(re_amount_currency,
    r"(?:Bs|\$)\s*(\d{1,3}(?:[.,]\d{3})*(?:[.,]\d{2}))");
re!(re_amount_bare, r"(\d{1,3}(?:[.,]\d{3})*(?:[.,]\d{2}))");

const REFERENCE_KEYWORDS: &[&str] = &["referencia", "ref", "trx", "operación", "operacion"];
const ACCOUNT_KEYWORDS: &[&str] = &["cuenta", "origen", "destino"];
const DESCRIPTION_KEYWORDS: &[&str] = &["pago", "transferencia", "depósito"];

// ── Public extraction API ─────────────────────────────────────────────────────

/// Parse recognized receipt text into a [`PaymentClaim`].
///
/// Total function: it never fails, and any field it cannot find stays
/// absent. Validity of an incomplete claim is judged by the matching
/// engine, not here.
pub fn extract_payment_claim(raw_text: &str) -> PaymentClaim {
    let lines: Vec<&str> = raw_text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let mut claim = PaymentClaim {
        raw_text: raw_text.to_string(),
        ..Default::default()
    };

    for line in &lines {
        let lower = line.to_lowercase();

        if claim.date.is_none() {
            claim.date = date_rule(line, &lower);
        }
        if claim.reference.is_none() {
            claim.reference = reference_rule(line, &lower);
        }
        if claim.bank_name.is_none() {
            claim.bank_name = bank_rule(line, &lower);
        }
        if claim.account_number.is_none() {
            claim.account_number = account_rule(line, &lower);
        }
        if claim.description.is_none() {
            claim.description = description_rule(line, &lower);
        }
    }

    claim.amount = amount_from_text(raw_text);

    // No field-specific description anywhere: fall back to the longest line,
    // which on these receipts tends to carry the operation summary.
    if claim.description.is_none() {
        claim.description = longest_line(&lines);
    }

    tracing::debug!(
        amount = ?claim.amount,
        date = ?claim.date,
        reference = ?claim.reference,
        "extracted payment claim"
    );

    claim
}

// ── Field rules (predicate + extractor, first match per field wins) ───────────

fn date_rule(line: &str, lower: &str) -> Option<String> {
    if !lower.contains("fecha") {
        return None;
    }
    let m = re_date().find(line)?;
    // Strip everything the OCR may have misread except digits and slashes.
    Some(
        m.as_str()
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '/')
            .collect(),
    )
}

fn reference_rule(line: &str, lower: &str) -> Option<String> {
    if !REFERENCE_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return None;
    }
    let caps = re_reference().captures(line)?;
    Some(caps[1].to_string())
}

fn bank_rule(line: &str, lower: &str) -> Option<String> {
    if !lower.contains("banco") && !re_bank_fragment().is_match(lower) {
        return None;
    }
    // Prefer the "0108 - BBVA PROVINCIAL" code-then-name form.
    if let Some(caps) = re_bank_code().captures(line) {
        return Some(caps[1].trim().to_string());
    }
    let caps = re_bank_name().captures(line)?;
    let name = caps[1].trim();
    (!name.is_empty()).then(|| name.to_string())
}

fn account_rule(line: &str, lower: &str) -> Option<String> {
    if !ACCOUNT_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return None;
    }
    // Full 4-4-2-10 account number.
    if let Some(m) = re_account_full().find(line) {
        return Some(m.as_str().to_string());
    }
    // Masked form, e.g. 0102****9203.
    if let Some(m) = re_account_masked().find(line) {
        return Some(m.as_str().to_string());
    }
    // Mobile-payment destination: an 041-prefixed phone number.
    let m = re_account_phone().find(line)?;
    let digits = m.as_str();
    digits.starts_with("041").then(|| digits.to_string())
}

fn description_rule(line: &str, lower: &str) -> Option<String> {
    if lower.contains("concepto") {
        let caps = re_concept().captures(line)?;
        let concept = caps[1].trim();
        return (!concept.is_empty()).then(|| concept.to_string());
    }
    DESCRIPTION_KEYWORDS
        .iter()
        .any(|k| lower.contains(k))
        .then(|| line.to_string())
}

// ── Amount (global, largest-value-wins) ───────────────────────────────────────

fn amount_from_text(text: &str) -> Option<Decimal> {
    let mut best: Option<Decimal> = None;

    for re in [re_amount_currency(), re_amount_bare()] {
        for caps in re.captures_iter(text) {
            let Some(value) = normalize::parse_amount(&caps[1]) else {
                continue;
            };
            if value > Decimal::ZERO && best.is_none_or(|b| value > b) {
                best = Some(value);
            }
        }
    }

    best
}

fn longest_line(lines: &[&str]) -> Option<String> {
    let longest = lines.iter().copied().fold("", |best, line| {
        if line.chars().count() > best.chars().count() {
            line
        } else {
            best
        }
    });
    (!longest.is_empty()).then(|| longest.to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
