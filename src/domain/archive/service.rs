use super::error::ArchiveServiceError;
use super::{ARCHIVE_CONTENT_TYPE, ARCHIVE_FILE_NAME};
use crate::domain::synthesis::AudioArtifact;
use crate::infrastructure::repositories::ArtifactStore;
use async_trait::async_trait;
use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::sync::Arc;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// An in-memory zip ready to be served as a single download.
#[derive(Debug, Clone)]
pub struct ArchiveBundle {
    pub bytes: Vec<u8>,
    pub entry_count: usize,
    /// Artifacts whose files were gone when the bundle was built
    pub skipped: Vec<String>,
}

impl ArchiveBundle {
    pub fn file_name(&self) -> &'static str {
        ARCHIVE_FILE_NAME
    }

    pub fn content_type(&self) -> &'static str {
        ARCHIVE_CONTENT_TYPE
    }
}

pub struct ArchiveService {
    store: Arc<ArtifactStore>,
}

impl ArchiveService {
    pub fn new(store: Arc<ArtifactStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
pub trait ArchiveServiceApi: Send + Sync {
    /// Bundle artifacts into one deflate-compressed zip
    ///
    /// Entries are named by base file name with no directories. Missing files
    /// are skipped; any other read failure fails the whole bundle.
    async fn bundle(
        &self,
        artifacts: &[AudioArtifact],
    ) -> Result<ArchiveBundle, ArchiveServiceError>;
}

#[async_trait]
impl ArchiveServiceApi for ArchiveService {
    async fn bundle(
        &self,
        artifacts: &[AudioArtifact],
    ) -> Result<ArchiveBundle, ArchiveServiceError> {
        if artifacts.is_empty() {
            return Err(ArchiveServiceError::Invalid("Nothing to archive".to_string()));
        }

        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(artifacts.len());
        let mut skipped = Vec::new();

        for artifact in artifacts {
            let entry_name = entry_name(artifact);
            if !seen.insert(entry_name.clone()) {
                return Err(ArchiveServiceError::DuplicateEntry(entry_name));
            }

            match self.store.read(&artifact.path).await? {
                Some(bytes) => entries.push((entry_name, bytes)),
                None => {
                    tracing::warn!(
                        path = %artifact.path.display(),
                        "Artifact missing, leaving it out of the archive"
                    );
                    skipped.push(entry_name);
                }
            }
        }

        let entry_count = entries.len();
        let bytes = tokio::task::spawn_blocking(move || write_zip(entries))
            .await
            .map_err(|e| {
                ArchiveServiceError::Other(anyhow::anyhow!("archive task failed: {}", e))
            })??;

        tracing::info!(
            entry_count,
            skipped_count = skipped.len(),
            archive_size_bytes = bytes.len(),
            "Archive built"
        );

        Ok(ArchiveBundle {
            bytes,
            entry_count,
            skipped,
        })
    }
}

fn entry_name(artifact: &AudioArtifact) -> String {
    artifact
        .path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| artifact.name.clone())
}

fn write_zip(entries: Vec<(String, Vec<u8>)>) -> Result<Vec<u8>, ArchiveServiceError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, bytes) in entries {
        writer.start_file(name, options)?;
        writer.write_all(&bytes)?;
    }

    Ok(writer.finish()?.into_inner())
}
