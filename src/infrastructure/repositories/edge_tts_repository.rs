use super::text_chunks::split_into_chunks;
use super::tts_repository::TtsRepository;
use async_trait::async_trait;
use chrono::Utc;
use futures::{SinkExt, StreamExt};
use sha2::{Digest, Sha256};
use std::time::Duration;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use uuid::Uuid;

/// Edge read-aloud rejects SSML payloads much over 4 KiB; leave room for
/// markup and entity escaping.
const MAX_CHUNK_BYTES: usize = 3000;

const TRUSTED_CLIENT_TOKEN: &str = "6A5AA1D4EAFF4E9FB37E23D68491D6F4";
const WSS_URL: &str =
    "wss://speech.platform.bing.com/consumer/speech/synthesize/readaloud/edge/v1";
const SEC_MS_GEC_VERSION: &str = "1-130.0.2849.68";
const ORIGIN: &str = "chrome-extension://jdiccldimpdaibmpdkjnbmckianbfold";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.36 Edg/130.0.0.0";
const OUTPUT_FORMAT: &str = "audio-24khz-48kbitrate-mono-mp3";

/// Seconds between 1601-01-01 and 1970-01-01
const WINDOWS_EPOCH_OFFSET_SECS: u64 = 11_644_473_600;

/// Microsoft Edge read-aloud implementation of TTS repository
pub struct EdgeTtsRepository {
    receive_timeout: Duration,
}

impl EdgeTtsRepository {
    pub fn new(receive_timeout: Duration) -> Self {
        Self { receive_timeout }
    }

    /// Open one websocket session and synthesize a single chunk
    async fn call_edge(&self, text: &str, voice: &str) -> Result<Vec<u8>, String> {
        let connection_id = Uuid::new_v4().simple().to_string();
        let url = format!(
            "{}?TrustedClientToken={}&ConnectionId={}&Sec-MS-GEC={}&Sec-MS-GEC-Version={}",
            WSS_URL,
            TRUSTED_CLIENT_TOKEN,
            connection_id,
            sec_ms_gec(Utc::now().timestamp().max(0) as u64),
            SEC_MS_GEC_VERSION
        );

        let mut request = url
            .into_client_request()
            .map_err(|e| format!("Invalid Edge TTS request: {}", e))?;
        let headers = request.headers_mut();
        headers.insert("Origin", HeaderValue::from_static(ORIGIN));
        headers.insert("User-Agent", HeaderValue::from_static(USER_AGENT));
        headers.insert("Pragma", HeaderValue::from_static("no-cache"));
        headers.insert("Cache-Control", HeaderValue::from_static("no-cache"));

        tracing::info!(
            voice = voice,
            connection_id = %connection_id,
            text_length = text.len(),
            "Connecting to Edge TTS"
        );

        let (ws_stream, _response) = connect_async(request).await.map_err(|e| {
            tracing::error!(error = %e, voice = voice, "Edge TTS connection failed");
            format!("Edge TTS connection error: {}", e)
        })?;
        let (mut write, mut read) = ws_stream.split();

        let timestamp = edge_timestamp();
        write
            .send(Message::text(speech_config_message(&timestamp)))
            .await
            .map_err(|e| format!("Failed to send Edge TTS config: {}", e))?;
        write
            .send(Message::text(ssml_message(
                &connection_id,
                &timestamp,
                &build_ssml(text, voice),
            )))
            .await
            .map_err(|e| format!("Failed to send Edge TTS request: {}", e))?;

        let mut audio = Vec::new();
        loop {
            let next = tokio::time::timeout(self.receive_timeout, read.next())
                .await
                .map_err(|_| {
                    format!(
                        "Edge TTS timed out after {}s",
                        self.receive_timeout.as_secs()
                    )
                })?;

            match next {
                Some(Ok(Message::Binary(data))) => {
                    if let Some(chunk) = audio_payload(&data) {
                        audio.extend_from_slice(chunk);
                    }
                }
                Some(Ok(Message::Text(message))) => {
                    if message.as_str().contains("Path:turn.end") {
                        break;
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    return Err(format!(
                        "Edge TTS closed the connection before finishing: {:?}",
                        frame
                    ));
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(format!("Edge TTS stream error: {}", e)),
                None => return Err("Edge TTS connection ended unexpectedly".to_string()),
            }
        }

        let _ = write.close().await;

        if audio.is_empty() {
            // Unknown voices finish the turn without sending any audio
            return Err(format!("Edge TTS returned no audio for voice {}", voice));
        }

        tracing::debug!(audio_size = audio.len(), "Edge TTS audio received");
        Ok(audio)
    }
}

#[async_trait]
impl TtsRepository for EdgeTtsRepository {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, String> {
        let start_time = std::time::Instant::now();

        let chunks = split_into_chunks(text, MAX_CHUNK_BYTES);
        let mut audio_data = Vec::new();
        for (index, chunk) in chunks.iter().enumerate() {
            tracing::debug!(chunk_index = index, chunk_size = chunk.len(), "Synthesizing chunk");
            audio_data.extend(self.call_edge(chunk, voice).await?);
        }

        let duration = start_time.elapsed();
        tracing::info!(
            provider = "edge",
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
        "edge"
    }
}

/// Anti-abuse token: SHA-256 over the Windows file time (100ns ticks),
/// rounded down to five minutes, followed by the client token.
fn sec_ms_gec(unix_secs: u64) -> String {
    let secs = unix_secs + WINDOWS_EPOCH_OFFSET_SECS;
    let ticks = (secs - secs % 300) * 10_000_000;
    let digest = Sha256::digest(format!("{}{}", ticks, TRUSTED_CLIENT_TOKEN).as_bytes());
    format!("{:X}", digest)
}

fn edge_timestamp() -> String {
    Utc::now()
        .format("%a %b %d %Y %H:%M:%S GMT+0000 (Coordinated Universal Time)")
        .to_string()
}

fn speech_config_message(timestamp: &str) -> String {
    format!(
        "X-Timestamp:{}\r\nContent-Type:application/json; charset=utf-8\r\n\
         Path:speech.config\r\n\r\n\
         {{\"context\":{{\"synthesis\":{{\"audio\":{{\"metadataoptions\":{{\
         \"sentenceBoundaryEnabled\":\"false\",\"wordBoundaryEnabled\":\"false\"}},\
         \"outputFormat\":\"{}\"}}}}}}}}\r\n",
        timestamp, OUTPUT_FORMAT
    )
}

fn ssml_message(request_id: &str, timestamp: &str, ssml: &str) -> String {
    format!(
        "X-RequestId:{}\r\nContent-Type:application/ssml+xml\r\n\
         X-Timestamp:{}Z\r\nPath:ssml\r\n\r\n{}",
        request_id, timestamp, ssml
    )
}

fn build_ssml(text: &str, voice: &str) -> String {
    format!(
        "<speak version='1.0' xmlns='http://www.w3.org/2001/10/synthesis' xml:lang='en-US'>\
         <voice name='{}'><prosody pitch='+0Hz' rate='+0%' volume='+0%'>{}</prosody>\
         </voice></speak>",
        escape_xml(voice),
        escape_xml(text)
    )
}

/// Escape XML metacharacters and blank out control characters the service rejects
fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c if c.is_control() && c != '\n' && c != '\t' => escaped.push(' '),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Binary frames are `[u16 header length][header][payload]`; only
/// `Path:audio` frames carry MP3 bytes.
fn audio_payload(frame: &[u8]) -> Option<&[u8]> {
    if frame.len() < 2 {
        return None;
    }
    let header_len = u16::from_be_bytes([frame[0], frame[1]]) as usize;
    let body_start = 2 + header_len;
    if frame.len() < body_start {
        return None;
    }
    let header = std::str::from_utf8(&frame[2..body_start]).ok()?;
    if header.lines().any(|line| line.trim() == "Path:audio") {
        Some(&frame[body_start..])
    } else {
        None
    }
}
