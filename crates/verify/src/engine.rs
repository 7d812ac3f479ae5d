//! Claim-to-statement matching.
//!
//! Each statement transaction is scored against the claim on four
//! independent factors — amount, date, reference, description — and the
//! weighted sum becomes a confidence in `[0, 1]`. The model is deliberately
//! rule-based and explainable: the verdict always carries the per-factor
//! booleans of the match that produced it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use cotejo_core::{normalize, PaymentClaim, TransactionRecord};

use crate::util::levenshtein_distance;

const WEIGHT_AMOUNT: f32 = 0.4;
const WEIGHT_DATE: f32 = 0.3;
const WEIGHT_REFERENCE: f32 = 0.2;
const WEIGHT_DESCRIPTION: f32 = 0.1;

/// Which factors agreed for one (claim, transaction) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchDetail {
    pub amount_match: bool,
    pub date_match: bool,
    pub reference_match: bool,
    pub description_match: bool,
}

/// A transaction that survived the minimum-confidence filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub transaction: TransactionRecord,
    pub confidence: f32,
    pub details: MatchDetail,
}

/// The verdict for one claim: accept/reject plus supporting evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub confidence: f32,
    pub matches: Vec<MatchResult>,
    pub errors: Vec<String>,
    pub details: MatchDetail,
}

impl ValidationResult {
    fn rejected(errors: Vec<String>) -> Self {
        Self {
            is_valid: false,
            confidence: 0.0,
            matches: Vec::new(),
            errors,
            details: MatchDetail::default(),
        }
    }
}

/// The scoring model with its tunables explicit.
pub struct PaymentMatcher {
    /// Amounts closer than this compare equal.
    pub amount_tolerance: Decimal,
    /// Allowed day gap between receipt and posting (bank processing lag).
    pub date_window_days: i64,
    /// A transaction below this confidence is not even a candidate.
    pub candidate_floor: f32,
    /// Top confidence at or above this accepts the payment.
    pub accept_threshold: f32,
    /// Minimum description similarity before that factor contributes.
    pub similarity_floor: f32,
}

impl Default for PaymentMatcher {
    fn default() -> Self {
        Self {
            amount_tolerance: Decimal::new(1, 2), // 0.01
            date_window_days: 2,
            candidate_floor: 0.3,
            accept_threshold: 0.7,
            similarity_floor: 0.6,
        }
    }
}

impl PaymentMatcher {
    /// Score a claim against the statement's transactions and render a
    /// verdict. Total function: every failure mode is encoded in the
    /// result's `errors`, never an `Err` or a panic.
    pub fn validate(
        &self,
        claim: &PaymentClaim,
        transactions: &[TransactionRecord],
    ) -> ValidationResult {
        if transactions.is_empty() {
            return ValidationResult::rejected(vec![
                "no transactions found in the account statement".to_string(),
            ]);
        }

        let (claim_amount, claim_date_text) = match (claim.amount, claim.date.as_deref()) {
            (Some(amount), Some(date)) => (amount, date),
            (amount, date) => {
                let mut errors = Vec::new();
                if amount.is_none() {
                    errors.push("could not extract the payment amount from the receipt".to_string());
                }
                if date.is_none() {
                    errors.push("could not extract the payment date from the receipt".to_string());
                }
                return ValidationResult::rejected(errors);
            }
        };

        // A claim date that fails normalization is not an error by itself:
        // the other factors can still score, it just never matches on date.
        let claim_date = normalize::parse_date(claim_date_text);

        let mut scored: Vec<(usize, MatchResult)> = transactions
            .iter()
            .enumerate()
            .filter_map(|(index, tx)| {
                let (confidence, details) = self.score(claim, claim_amount, claim_date, tx);
                (confidence > self.candidate_floor).then(|| {
                    (
                        index,
                        MatchResult {
                            transaction: tx.clone(),
                            confidence,
                            details,
                        },
                    )
                })
            })
            .collect();

        // Descending confidence; statement order is the explicit tie-break so
        // ranking is fully deterministic.
        scored.sort_by(|(ia, a), (ib, b)| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
                .then(ia.cmp(ib))
        });

        let matches: Vec<MatchResult> = scored.into_iter().map(|(_, m)| m).collect();

        tracing::debug!(
            candidates = matches.len(),
            best = ?matches.first().map(|m| m.confidence),
            "scored payment claim against statement"
        );

        match matches.first() {
            Some(best) => {
                let confidence = best.confidence;
                let details = best.details;
                ValidationResult {
                    is_valid: confidence >= self.accept_threshold,
                    confidence,
                    matches,
                    errors: Vec::new(),
                    details,
                }
            }
            None => ValidationResult {
                is_valid: false,
                confidence: 0.0,
                matches,
                errors: Vec::new(),
                details: MatchDetail::default(),
            },
        }
    }

    /// Validate several receipts against the same statement.
    pub fn validate_batch(
        &self,
        claims: &[PaymentClaim],
        transactions: &[TransactionRecord],
    ) -> Vec<ValidationResult> {
        claims
            .iter()
            .map(|claim| self.validate(claim, transactions))
            .collect()
    }

    fn score(
        &self,
        claim: &PaymentClaim,
        claim_amount: Decimal,
        claim_date: Option<chrono::NaiveDate>,
        tx: &TransactionRecord,
    ) -> (f32, MatchDetail) {
        let mut details = MatchDetail::default();
        let mut confidence = 0.0f32;

        if (tx.amount - claim_amount).abs() < self.amount_tolerance {
            details.amount_match = true;
            confidence += WEIGHT_AMOUNT;
        }

        if let Some(date) = claim_date {
            if (tx.date - date).num_days().abs() <= self.date_window_days {
                details.date_match = true;
                confidence += WEIGHT_DATE;
            }
        }

        if let (Some(claim_ref), Some(tx_ref)) = (claim.reference.as_deref(), tx.reference.as_deref())
        {
            if claim_ref == tx_ref {
                details.reference_match = true;
                confidence += WEIGHT_REFERENCE;
            }
        }

        if let (Some(claim_desc), Some(tx_desc)) =
            (claim.description.as_deref(), tx.description.as_deref())
        {
            let similarity = description_similarity(claim_desc, tx_desc);
            if similarity > self.similarity_floor {
                details.description_match = true;
                confidence += WEIGHT_DESCRIPTION * similarity;
            }
        }

        (confidence, details)
    }
}

/// Case-folded similarity in `[0, 1]`: `1 − distance / len(longer)`.
fn description_similarity(s1: &str, s2: &str) -> f32 {
    let a = s1.to_lowercase();
    let b = s2.to_lowercase();

    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }

    1.0 - (levenshtein_distance(&a, &b) as f32 / max_len as f32)
}
