use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tts_batch_backend::infrastructure::repositories::TtsRepository;

/// Scriptable stand-in for the speech engine.
///
/// Audio bytes are `FAKE-MP3|{voice}|{text}` so tests can check that each
/// file was produced by the voice it claims.
#[derive(Default)]
pub struct FakeTtsEngine {
    failing_voices: Mutex<HashSet<String>>,
    delays_ms: Mutex<HashMap<String, u64>>,
    calls: AtomicUsize,
}

impl FakeTtsEngine {
    pub fn fail_on_voice(&self, voice: &str) {
        self.failing_voices.lock().insert(voice.to_string());
    }

    pub fn delay_voice(&self, voice: &str, millis: u64) {
        self.delays_ms.lock().insert(voice.to_string(), millis);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn audio_for(voice: &str, text: &str) -> Vec<u8> {
        format!("FAKE-MP3|{}|{}", voice, text).into_bytes()
    }
}

#[async_trait]
impl TtsRepository for FakeTtsEngine {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = self.delays_ms.lock().get(voice).copied();
        if let Some(millis) = delay {
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }

        if self.failing_voices.lock().contains(voice) {
            return Err(format!("voice {} is not supported", voice));
        }
        Ok(Self::audio_for(voice, text))
    }

    fn provider(&self) -> &'static str {
        "fake"
    }
}
