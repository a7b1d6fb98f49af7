pub mod error;
pub mod model;
pub mod service;
pub mod voices;

pub use error::SynthesisServiceError;
pub use model::{
    expand_tasks, voice_for_index, AudioArtifact, Batch, SynthesisRequest, SynthesisTask,
    MAX_REPEAT_COUNT,
};
pub use service::{SynthesisService, SynthesisServiceApi};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request for POST /api/batches
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateBatchRequest {
    pub text: String,
    pub voices: Vec<String>,
    pub repeat_count: i64,
}

impl From<CreateBatchRequest> for SynthesisRequest {
    fn from(request: CreateBatchRequest) -> Self {
        SynthesisRequest::new(request.text, request.voices, request.repeat_count)
    }
}

/// Response for batch endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub artifacts: Vec<ArtifactResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ArtifactResponse {
    pub name: String,
    pub label: String,
    pub voice: String,
    pub position: usize,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
    pub url: String,
}

impl From<&Batch> for BatchResponse {
    fn from(batch: &Batch) -> Self {
        Self {
            id: batch.id,
            created_at: batch.created_at,
            artifacts: batch
                .artifacts
                .iter()
                .map(|artifact| ArtifactResponse {
                    name: artifact.name.clone(),
                    label: artifact.label(),
                    voice: artifact.source_task.voice.clone(),
                    position: artifact.source_task.position,
                    size_bytes: artifact.size_bytes,
                    created_at: artifact.created_at,
                    url: format!("/api/batches/{}/artifacts/{}", batch.id, artifact.name),
                })
                .collect(),
        }
    }
}

/// Response for GET /api/voices
#[derive(Debug, Serialize, Deserialize)]
pub struct VoicesResponse {
    pub voices: Vec<voices::VoiceOption>,
    pub default_voices: Vec<String>,
    pub default_text: String,
    pub max_repeat_count: i64,
}
