use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum ArchiveServiceError {
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("duplicate archive entry: {0}")]
    DuplicateEntry(String),
    #[error("failed to read artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to write archive: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ArchiveServiceError> for AppError {
    fn from(err: ArchiveServiceError) -> Self {
        match err {
            ArchiveServiceError::Invalid(msg) => AppError::BadRequest(msg),
            other => AppError::Archive(other.to_string()),
        }
    }
}
