use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The structured payment facts extracted from one receipt image.
///
/// Extraction is best-effort over noisy OCR text, so every field may be
/// absent; absence is not an error here — the matching engine decides what
/// an incomplete claim is worth. `date` stays as cleaned text rather than a
/// calendar date because the matcher normalizes it alongside the statement
/// side. `raw_text` is always retained for audit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentClaim {
    pub amount: Option<Decimal>,
    pub date: Option<String>,
    pub reference: Option<String>,
    pub description: Option<String>,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub raw_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_claim_is_all_absent() {
        let claim = PaymentClaim::default();
        assert!(claim.amount.is_none());
        assert!(claim.date.is_none());
        assert!(claim.reference.is_none());
        assert!(claim.raw_text.is_empty());
    }

    #[test]
    fn absent_fields_serialize_as_null() {
        let claim = PaymentClaim {
            raw_text: "Pago Móvil".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&claim).unwrap();
        assert!(json["amount"].is_null());
        assert_eq!(json["raw_text"], "Pago Móvil");
    }
}
