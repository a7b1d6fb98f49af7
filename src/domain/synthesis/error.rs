use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum SynthesisServiceError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("synthesis failed for voice {voice} (file {position}): {cause}")]
    Synthesis {
        voice: String,
        position: usize,
        cause: String,
    },
    #[error("storage error: {0}")]
    Storage(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<SynthesisServiceError> for AppError {
    fn from(err: SynthesisServiceError) -> Self {
        match err {
            SynthesisServiceError::InvalidRequest(msg) => AppError::BadRequest(msg),
            err @ SynthesisServiceError::Synthesis { .. } => {
                AppError::ExternalService(err.to_string())
            }
            SynthesisServiceError::Storage(msg) => AppError::Internal(msg),
            SynthesisServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
