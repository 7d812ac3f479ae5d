pub mod claim;
pub mod recognizer;
pub mod service;

pub use claim::extract_payment_claim;
pub use recognizer::{MockRecognizer, OcrBackend, OcrError};
pub use service::RecognitionService;

#[cfg(feature = "tesseract")]
pub use recognizer::tesseract_backend::TesseractRecognizer;
