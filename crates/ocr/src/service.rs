//! Shared recognition worker.
//!
//! OCR engines hold per-instance state (language models, configuration), so
//! a process keeps one long-lived backend and overlapping requests must not
//! reach it concurrently. `RecognitionService` owns that single worker:
//! initialization runs at most once, lazily, under the same mutex that
//! serializes recognition, and an initialization failure is latched — later
//! calls report the backend as unavailable instead of retrying.

use tokio::sync::Mutex;

use crate::claim::extract_payment_claim;
use crate::recognizer::{OcrBackend, OcrError};
use cotejo_core::PaymentClaim;

enum WorkerState<B> {
    Pending,
    Ready(B),
    Failed(String),
}

pub struct RecognitionService<B: OcrBackend> {
    state: Mutex<WorkerState<B>>,
    init: Box<dyn Fn() -> Result<B, OcrError> + Send + Sync>,
}

impl<B: OcrBackend> RecognitionService<B> {
    /// Build a service whose backend is constructed on first use.
    pub fn new(init: impl Fn() -> Result<B, OcrError> + Send + Sync + 'static) -> Self {
        Self {
            state: Mutex::new(WorkerState::Pending),
            init: Box::new(init),
        }
    }

    /// Build a service around an already-constructed backend.
    pub fn with_backend(backend: B) -> Self {
        Self {
            state: Mutex::new(WorkerState::Ready(backend)),
            init: Box::new(|| {
                Err(OcrError::Unavailable(
                    "backend was supplied at construction".to_string(),
                ))
            }),
        }
    }

    /// Recognize text from image bytes. Calls are serialized on the worker;
    /// the first call pays the initialization cost.
    pub async fn recognize(&self, image_bytes: &[u8]) -> Result<String, OcrError> {
        let mut guard = self.state.lock().await;

        if let WorkerState::Pending = *guard {
            match (self.init)() {
                Ok(backend) => *guard = WorkerState::Ready(backend),
                Err(e) => {
                    let reason = e.to_string();
                    tracing::warn!(%reason, "recognition backend failed to initialize");
                    *guard = WorkerState::Failed(reason);
                }
            }
        }

        match &*guard {
            WorkerState::Ready(backend) => backend.recognize(image_bytes),
            WorkerState::Failed(reason) => Err(OcrError::Unavailable(reason.clone())),
            WorkerState::Pending => unreachable!("initialization resolved above"),
        }
    }

    /// Recognize and parse in one step: image bytes → [`PaymentClaim`].
    /// Recognition failures surface as the error; the claim parse itself
    /// never fails (absent fields are its failure signal).
    pub async fn extract_claim(&self, image_bytes: &[u8]) -> Result<PaymentClaim, OcrError> {
        let text = self.recognize(image_bytes).await?;
        Ok(extract_payment_claim(&text))
    }

    /// Whether the worker is usable (or still untried).
    pub async fn is_available(&self) -> bool {
        !matches!(&*self.state.lock().await, WorkerState::Failed(_))
    }
}
