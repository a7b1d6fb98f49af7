use super::error::SynthesisServiceError;
use super::model::{expand_tasks, AudioArtifact, SynthesisRequest, SynthesisTask};
use crate::infrastructure::repositories::{ArtifactStore, TtsRepository};
use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;

pub struct SynthesisService {
    tts_repo: Arc<dyn TtsRepository>,
    store: Arc<ArtifactStore>,
    max_concurrency: usize,
}

impl SynthesisService {
    /// `max_concurrency` bounds the fan-out; `1` runs tasks one after another
    /// in batch order.
    pub fn new(
        tts_repo: Arc<dyn TtsRepository>,
        store: Arc<ArtifactStore>,
        max_concurrency: usize,
    ) -> Self {
        Self {
            tts_repo,
            store,
            max_concurrency: max_concurrency.max(1),
        }
    }

    pub fn provider(&self) -> &'static str {
        self.tts_repo.provider()
    }
}

#[async_trait]
pub trait SynthesisServiceApi: Send + Sync {
    /// Render every task of a request into the artifact store
    ///
    /// This operation:
    /// - Validates the request before touching the engine or the store
    /// - Expands it into `repeat_count` tasks, voices assigned round-robin
    /// - Runs the tasks with bounded concurrency
    ///
    /// Returns one artifact per task in batch order, or the failure of the
    /// lowest-positioned task that failed. Files written by sibling tasks of a
    /// failed batch stay in the store.
    async fn synthesize_batch(
        &self,
        request: SynthesisRequest,
    ) -> Result<Vec<AudioArtifact>, SynthesisServiceError>;
}

#[async_trait]
impl SynthesisServiceApi for SynthesisService {
    async fn synthesize_batch(
        &self,
        request: SynthesisRequest,
    ) -> Result<Vec<AudioArtifact>, SynthesisServiceError> {
        request.validate()?;

        let tasks = expand_tasks(&request);
        tracing::info!(
            provider = self.provider(),
            text_length = request.text.chars().count(),
            voice_count = request.voices.len(),
            task_count = tasks.len(),
            max_concurrency = self.max_concurrency,
            "Starting synthesis batch"
        );

        let start_time = std::time::Instant::now();
        let artifacts = if self.max_concurrency == 1 {
            self.run_sequential(tasks).await?
        } else {
            self.run_concurrent(tasks).await?
        };

        tracing::info!(
            artifact_count = artifacts.len(),
            total_bytes = artifacts.iter().map(|a| a.size_bytes).sum::<u64>(),
            latency_ms = start_time.elapsed().as_millis(),
            "Synthesis batch completed"
        );

        Ok(artifacts)
    }
}

impl SynthesisService {
    async fn run_sequential(
        &self,
        tasks: Vec<SynthesisTask>,
    ) -> Result<Vec<AudioArtifact>, SynthesisServiceError> {
        let mut artifacts = Vec::with_capacity(tasks.len());
        for task in tasks {
            artifacts.push(run_task(self.tts_repo.as_ref(), &self.store, task).await?);
        }
        Ok(artifacts)
    }

    async fn run_concurrent(
        &self,
        tasks: Vec<SynthesisTask>,
    ) -> Result<Vec<AudioArtifact>, SynthesisServiceError> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));

        let handles = tasks.into_iter().map(|task| {
            let tts_repo = self.tts_repo.clone();
            let store = self.store.clone();
            let semaphore = semaphore.clone();
            tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| SynthesisServiceError::Other(e.into()))?;
                run_task(tts_repo.as_ref(), &store, task).await
            })
        });

        // join_all keeps input order, so results line up with task positions
        // whatever order the tasks finished in
        let results = join_all(handles).await;

        let mut artifacts = Vec::with_capacity(results.len());
        for result in results {
            let artifact = result.map_err(|e| {
                SynthesisServiceError::Other(anyhow::anyhow!("synthesis task aborted: {}", e))
            })??;
            artifacts.push(artifact);
        }
        Ok(artifacts)
    }
}

async fn run_task(
    tts_repo: &dyn TtsRepository,
    store: &ArtifactStore,
    task: SynthesisTask,
) -> Result<AudioArtifact, SynthesisServiceError> {
    let audio = tts_repo
        .synthesize(&task.text, &task.voice)
        .await
        .map_err(|cause| {
            tracing::error!(
                voice = %task.voice,
                position = task.position,
                error = %cause,
                "Synthesis task failed"
            );
            SynthesisServiceError::Synthesis {
                voice: task.voice.clone(),
                position: task.position,
                cause,
            }
        })?;

    if audio.is_empty() {
        return Err(SynthesisServiceError::Synthesis {
            voice: task.voice.clone(),
            position: task.position,
            cause: "engine returned no audio".to_string(),
        });
    }

    let name = task.file_name();
    let path = store
        .write(&name, &audio)
        .await
        .map_err(|e| SynthesisServiceError::Storage(format!("Failed to write {}: {}", name, e)))?;

    tracing::debug!(
        voice = %task.voice,
        position = task.position,
        file = %name,
        size = audio.len(),
        "Synthesis task completed"
    );

    Ok(AudioArtifact {
        name,
        path,
        size_bytes: audio.len() as u64,
        source_task: task,
        created_at: Utc::now(),
    })
}
