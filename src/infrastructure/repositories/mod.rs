pub mod artifact_store;
pub mod batch_repository;
pub mod edge_tts_repository;
pub mod openai_tts_repository;
pub mod polly_tts_repository;
pub mod text_chunks;
pub mod tts_repository;

pub use artifact_store::ArtifactStore;
pub use batch_repository::BatchRepository;
pub use edge_tts_repository::EdgeTtsRepository;
pub use openai_tts_repository::OpenAiTtsRepository;
pub use polly_tts_repository::PollyTtsRepository;
pub use tts_repository::TtsRepository;
