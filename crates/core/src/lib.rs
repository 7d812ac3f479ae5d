pub mod claim;
pub mod normalize;
pub mod transaction;

pub use claim::PaymentClaim;
pub use transaction::{TransactionKind, TransactionRecord};
