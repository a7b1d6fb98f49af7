use axum::Json;

use crate::domain::synthesis::{
    voices::{chinese_voice_options, DEFAULT_TEXT, DEFAULT_VOICES},
    VoicesResponse, MAX_REPEAT_COUNT,
};

/// GET /api/voices - Voice catalogue and form defaults
pub async fn list_voices() -> Json<VoicesResponse> {
    Json(VoicesResponse {
        voices: chinese_voice_options(),
        default_voices: DEFAULT_VOICES.iter().map(|v| v.to_string()).collect(),
        default_text: DEFAULT_TEXT.to_string(),
        max_repeat_count: MAX_REPEAT_COUNT,
    })
}
