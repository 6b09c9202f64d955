use thiserror::Error;

use crate::store::StoreError;

/// Pipeline-level error type. These are the only exits a caller of
/// [`crate::pipeline::Pipeline`] can observe.
///
/// Decode failures and LLM faults are deliberately absent: they degrade in
/// place (a `warning` on the upload outcome, a retained rule-based record)
/// rather than surfacing here. The pipeline prefers a partial record to no
/// record.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl From<StoreError> for PipelineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => PipelineError::Conflict(msg),
            other => PipelineError::Persistence(other.to_string()),
        }
    }
}
