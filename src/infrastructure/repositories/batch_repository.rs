use super::artifact_store::ArtifactStore;
use crate::domain::synthesis::Batch;
use moka::future::Cache;
use moka::notification::RemovalCause;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

const MAX_BATCHES: u64 = 100;

/// Generated batches, retained for a bounded time.
///
/// When a batch leaves the cache (expired, pushed out by capacity, or
/// explicitly removed) its files are deleted from the artifact store.
pub struct BatchRepository {
    cache: Cache<Uuid, Arc<Batch>>,
}

impl BatchRepository {
    pub fn new(retention: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(MAX_BATCHES)
            .time_to_live(retention)
            .eviction_listener(|batch_id: Arc<Uuid>, batch: Arc<Batch>, cause| {
                if cause == RemovalCause::Replaced {
                    return;
                }
                for artifact in &batch.artifacts {
                    if let Err(e) = ArtifactStore::remove_sync(&artifact.path) {
                        tracing::warn!(
                            error = %e,
                            path = %artifact.path.display(),
                            "Failed to delete expired artifact"
                        );
                    }
                }
                tracing::info!(
                    batch_id = %batch_id,
                    cause = ?cause,
                    artifact_count = batch.artifacts.len(),
                    "Batch released"
                );
            })
            .build();

        Self { cache }
    }

    pub async fn insert(&self, batch: Batch) -> Arc<Batch> {
        let batch = Arc::new(batch);
        self.cache.insert(batch.id, batch.clone()).await;
        batch
    }

    pub async fn find_by_id(&self, batch_id: Uuid) -> Option<Arc<Batch>> {
        self.cache.get(&batch_id).await
    }

    /// Forget a batch and delete its files. Returns false if it was unknown.
    pub async fn remove(&self, batch_id: Uuid) -> bool {
        let removed = self.cache.remove(&batch_id).await.is_some();
        self.cache.run_pending_tasks().await;
        removed
    }
}
