pub mod engine;
pub(crate) mod util;

pub use engine::{MatchDetail, MatchResult, PaymentMatcher, ValidationResult};
