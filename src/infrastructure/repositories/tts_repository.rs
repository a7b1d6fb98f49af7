use async_trait::async_trait;

/// Repository for TTS synthesis operations.
/// Abstracts the underlying TTS provider (Edge read-aloud, AWS Polly, OpenAI)
///
/// Implementations are responsible for:
/// - Handling provider-specific text length limitations
/// - Splitting text into chunks if needed
/// - Merging audio chunks into a single MP3 stream
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize `text` with the provider-specific `voice` identifier
    ///
    /// Returns merged audio data ready for playback (MP3 format)
    ///
    /// # Errors
    /// Returns a human-readable cause if the voice is unsupported, the input
    /// is rejected, or the provider is unavailable
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, String>;

    /// Short provider name used in logs and readiness checks
    fn provider(&self) -> &'static str;
}
