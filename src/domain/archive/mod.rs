pub mod error;
pub mod service;

pub use error::ArchiveServiceError;
pub use service::{ArchiveBundle, ArchiveService, ArchiveServiceApi};

pub const ARCHIVE_FILE_NAME: &str = "tts_outputs.zip";
pub const ARCHIVE_CONTENT_TYPE: &str = "application/zip";
