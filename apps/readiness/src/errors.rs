use thiserror::Error;
use uuid::Uuid;

/// Errors raised at the engine's only fallible seam: persisting results
/// through a caller-supplied store. The calculators themselves never fail.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Persistence error for student {student_id}: {message}")]
    Persistence { student_id: Uuid, message: String },

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl MetricsError {
    pub fn persistence(student_id: Uuid, message: impl Into<String>) -> Self {
        MetricsError::Persistence {
            student_id,
            message: message.into(),
        }
    }
}
