use super::text_chunks::split_into_chunks;
use super::tts_repository::TtsRepository;
use async_trait::async_trait;
use aws_sdk_polly::{
    types::{Engine, OutputFormat, VoiceId},
    Client as PollyClient,
};
use std::sync::Arc;

/// AWS Polly has a limit of 3000 characters per request
const MAX_CHUNK_BYTES: usize = 3000;

/// AWS Polly implementation of TTS repository.
///
/// Voice identifiers are Polly voice ids (`Zhiyu` for Mandarin).
pub struct PollyTtsRepository {
    polly_client: Arc<PollyClient>,
}

impl PollyTtsRepository {
    pub fn new(polly_client: Arc<PollyClient>) -> Self {
        Self { polly_client }
    }

    /// Call AWS Polly to synthesize a single text chunk
    async fn call_polly(&self, text: &str, voice: &str) -> Result<Vec<u8>, String> {
        if !VoiceId::values().contains(&voice) {
            return Err(format!("Unsupported Polly voice: {}", voice));
        }
        let voice_id = VoiceId::from(voice);
        let engine = Engine::Neural;

        tracing::info!(
            voice = voice,
            engine = ?engine,
            output_format = "Mp3",
            text_length = text.len(),
            "Calling AWS Polly synthesize_speech"
        );

        let result = self
            .polly_client
            .synthesize_speech()
            .text(text)
            .voice_id(voice_id)
            .output_format(OutputFormat::Mp3)
            .engine(engine.clone())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = ?e,
                    error_display = %e,
                    voice = voice,
                    engine = ?engine,
                    text_length = text.len(),
                    "AWS Polly synthesize_speech failed"
                );
                format!("AWS Polly error: {}", e)
            })?;

        let audio_stream = result.audio_stream.collect().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to collect audio stream from Polly response");
            format!("Failed to read audio stream: {}", e)
        })?;

        let audio_bytes = audio_stream.into_bytes().to_vec();
        tracing::debug!(audio_size = audio_bytes.len(), "Audio stream collected successfully");

        Ok(audio_bytes)
    }
}

#[async_trait]
impl TtsRepository for PollyTtsRepository {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, String> {
        let start_time = std::time::Instant::now();

        let chunks = split_into_chunks(text, MAX_CHUNK_BYTES);
        let mut audio_data = Vec::new();
        for (index, chunk) in chunks.iter().enumerate() {
            tracing::debug!(chunk_index = index, chunk_size = chunk.len(), "Synthesizing chunk");
            audio_data.extend(self.call_polly(chunk, voice).await?);
        }

        let duration = start_time.elapsed();
        tracing::info!(
            provider = "polly",
            voice = voice,
            latency_ms = duration.as_millis(),
            characters_count = text.chars().count(),
            chunk_count = chunks.len(),
            audio_size_bytes = audio_data.len(),
            "TTS synthesis completed"
        );

        Ok(audio_data)
    }

    fn provider(&self) -> &'static str {
        "polly"
    }
}
