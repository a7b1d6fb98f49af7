use super::error::SynthesisServiceError;
use super::voices::voice_slug;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use uuid::Uuid;

pub const MIN_REPEAT_COUNT: i64 = 1;
pub const MAX_REPEAT_COUNT: i64 = 10;
pub const MAX_TEXT_CHARS: usize = 10_000;

const SHORT_ID_LEN: usize = 8;

/// One batch request: the same text rendered `repeat_count` times, cycling
/// through `voices`.
///
/// `repeat_count` is signed so that any integer a client sends reaches
/// [`SynthesisRequest::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    pub text: String,
    pub voices: Vec<String>,
    pub repeat_count: i64,
}

impl SynthesisRequest {
    pub fn new(text: impl Into<String>, voices: Vec<String>, repeat_count: i64) -> Self {
        Self {
            text: text.into(),
            voices,
            repeat_count,
        }
    }

    pub fn validate(&self) -> Result<(), SynthesisServiceError> {
        if self.text.trim().is_empty() {
            return Err(SynthesisServiceError::InvalidRequest(
                "Text cannot be empty".to_string(),
            ));
        }
        if self.text.chars().count() > MAX_TEXT_CHARS {
            return Err(SynthesisServiceError::InvalidRequest(format!(
                "Text must be {} characters or less",
                MAX_TEXT_CHARS
            )));
        }
        if self.voices.is_empty() {
            return Err(SynthesisServiceError::InvalidRequest(
                "At least one voice must be selected".to_string(),
            ));
        }
        if self.voices.iter().any(|v| v.trim().is_empty()) {
            return Err(SynthesisServiceError::InvalidRequest(
                "Voice identifiers cannot be blank".to_string(),
            ));
        }
        if !(MIN_REPEAT_COUNT..=MAX_REPEAT_COUNT).contains(&self.repeat_count) {
            return Err(SynthesisServiceError::InvalidRequest(format!(
                "Repeat count must be between {} and {}, got {}",
                MIN_REPEAT_COUNT, MAX_REPEAT_COUNT, self.repeat_count
            )));
        }
        Ok(())
    }
}

/// A single synthesis job expanded from a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisTask {
    pub text: String,
    pub voice: String,
    /// 1-based position within the batch
    pub position: usize,
    pub output_id: String,
}

impl SynthesisTask {
    pub fn file_name(&self) -> String {
        format!("{}.mp3", self.output_id)
    }
}

/// A produced audio file living in the artifact store.
#[derive(Debug, Clone)]
pub struct AudioArtifact {
    pub name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub source_task: SynthesisTask,
    pub created_at: DateTime<Utc>,
}

impl AudioArtifact {
    pub fn label(&self) -> String {
        format!("File {}: {}", self.source_task.position, self.name)
    }
}

/// A successfully generated batch, kept around for preview and download.
#[derive(Debug, Clone)]
pub struct Batch {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub artifacts: Vec<AudioArtifact>,
}

impl Batch {
    pub fn new(artifacts: Vec<AudioArtifact>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            artifacts,
        }
    }

    pub fn artifact(&self, name: &str) -> Option<&AudioArtifact> {
        self.artifacts.iter().find(|a| a.name == name)
    }
}

/// Round-robin voice assignment: task `index` uses `voices[index % voices.len()]`.
pub fn voice_for_index(index: usize, voices: &[String]) -> Option<&String> {
    if voices.is_empty() {
        return None;
    }
    voices.get(index % voices.len())
}

/// `{voiceSlug}_{shortId}_{position}`, unique per call.
pub fn output_id(voice: &str, position: usize) -> String {
    let short_id: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(SHORT_ID_LEN)
        .collect();
    format!("{}_{}_{}", voice_slug(voice), short_id, position)
}

/// Expand a request into `repeat_count` tasks in batch order.
///
/// Does not validate; callers run [`SynthesisRequest::validate`] first. An
/// empty voice list expands to no tasks.
pub fn expand_tasks(request: &SynthesisRequest) -> Vec<SynthesisTask> {
    (0..request.repeat_count.max(0) as usize)
        .filter_map(|i| {
            voice_for_index(i, &request.voices).map(|voice| SynthesisTask {
                text: request.text.clone(),
                voice: voice.clone(),
                position: i + 1,
                output_id: output_id(voice, i + 1),
            })
        })
        .collect()
}
