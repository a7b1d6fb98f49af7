use axum::{
    body::Body,
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        archive::{ArchiveService, ArchiveServiceApi},
        synthesis::{
            Batch, BatchResponse, CreateBatchRequest, SynthesisService, SynthesisServiceApi,
        },
    },
    error::{AppError, AppResult},
    infrastructure::repositories::{ArtifactStore, BatchRepository},
};

const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

pub struct BatchController {
    synthesis_service: Arc<SynthesisService>,
    archive_service: Arc<ArchiveService>,
    batch_repo: Arc<BatchRepository>,
    store: Arc<ArtifactStore>,
}

impl BatchController {
    pub fn new(
        synthesis_service: Arc<SynthesisService>,
        archive_service: Arc<ArchiveService>,
        batch_repo: Arc<BatchRepository>,
        store: Arc<ArtifactStore>,
    ) -> Self {
        Self {
            synthesis_service,
            archive_service,
            batch_repo,
            store,
        }
    }

    /// POST /api/batches - Generate one MP3 per repeat, cycling voices
    pub async fn create_batch(
        State(controller): State<Arc<BatchController>>,
        payload: Result<Json<CreateBatchRequest>, JsonRejection>,
    ) -> AppResult<(StatusCode, Json<BatchResponse>)> {
        let Json(request) = payload?;
        let artifacts = controller
            .synthesis_service
            .synthesize_batch(request.into())
            .await?;

        let batch = controller.batch_repo.insert(Batch::new(artifacts)).await;
        tracing::info!(
            batch_id = %batch.id,
            artifact_count = batch.artifacts.len(),
            "Batch registered"
        );

        Ok((StatusCode::CREATED, Json(BatchResponse::from(batch.as_ref()))))
    }

    /// GET /api/batches/:batch_id - Describe a generated batch
    pub async fn get_batch(
        State(controller): State<Arc<BatchController>>,
        Path(batch_id): Path<Uuid>,
    ) -> AppResult<Json<BatchResponse>> {
        let batch = controller.find_batch(batch_id).await?;
        Ok(Json(BatchResponse::from(batch.as_ref())))
    }

    /// GET /api/batches/:batch_id/artifacts/:name - Stream one file for preview
    pub async fn get_artifact(
        State(controller): State<Arc<BatchController>>,
        Path((batch_id, name)): Path<(Uuid, String)>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let batch = controller.find_batch(batch_id).await?;

        // Only names that belong to the batch are served
        let artifact = batch
            .artifact(&name)
            .ok_or_else(|| AppError::NotFound(format!("Artifact {}", name)))?;

        let bytes = controller
            .store
            .read(&artifact.path)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to read {}: {}", name, e)))?
            .ok_or_else(|| AppError::NotFound(format!("Missing file: {}", name)))?;

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(AUDIO_CONTENT_TYPE));
        headers.insert(
            header::CONTENT_DISPOSITION,
            header_value(&format!("inline; filename=\"{}\"", artifact.name))?,
        );

        Ok((StatusCode::OK, headers, Body::from(bytes)))
    }

    /// GET /api/batches/:batch_id/archive - Download every file as one zip
    pub async fn download_archive(
        State(controller): State<Arc<BatchController>>,
        Path(batch_id): Path<Uuid>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let batch = controller.find_batch(batch_id).await?;
        let bundle = controller.archive_service.bundle(&batch.artifacts).await?;

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(bundle.content_type()));
        headers.insert(
            header::CONTENT_DISPOSITION,
            header_value(&format!("attachment; filename=\"{}\"", bundle.file_name()))?,
        );
        headers.insert("X-Archive-Entries", HeaderValue::from(bundle.entry_count));

        Ok((StatusCode::OK, headers, Body::from(bundle.bytes)))
    }

    /// DELETE /api/batches/:batch_id - Forget a batch and delete its files
    pub async fn delete_batch(
        State(controller): State<Arc<BatchController>>,
        Path(batch_id): Path<Uuid>,
    ) -> AppResult<StatusCode> {
        if controller.batch_repo.remove(batch_id).await {
            Ok(StatusCode::NO_CONTENT)
        } else {
            Err(AppError::NotFound(format!("Batch {}", batch_id)))
        }
    }

    async fn find_batch(&self, batch_id: Uuid) -> AppResult<Arc<Batch>> {
        self.batch_repo
            .find_by_id(batch_id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Batch {}", batch_id)))
    }
}

fn header_value(value: &str) -> AppResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| AppError::Internal(e.to_string()))
}
