use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Chinese neural voices offered by the Edge read-aloud engine.
pub const CHINESE_VOICES: &[&str] = &[
    "zh-CN-XiaoxiaoNeural",
    "zh-CN-XiaoyiNeural",
    "zh-CN-XiaohanNeural",
    "zh-CN-XiaomengNeural",
    "zh-CN-XiaomoNeural",
    "zh-CN-XiaoruiNeural",
    "zh-CN-XiaoshuangNeural",
    "zh-CN-XiaoxuanNeural",
    "zh-CN-XiaoyanNeural",
    "zh-CN-XiaoyuNeural",
    "zh-CN-YunjianNeural",
    "zh-CN-YunxiNeural",
    "zh-CN-YunxiaNeural",
    "zh-CN-YunyangNeural",
];

pub const DEFAULT_VOICES: &[&str] = &["zh-CN-XiaoxiaoNeural", "zh-CN-YunxiNeural"];

pub const DEFAULT_TEXT: &str = "你好，我是你的中文老师。";

static LOCALE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]{2,3}-[A-Za-z]{2,4}-").expect("valid locale pattern"));

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]+").expect("valid slug pattern"));

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoiceOption {
    pub id: String,
    pub label: String,
}

/// The catalogue shown to users, with the locale prefix stripped from labels.
pub fn chinese_voice_options() -> Vec<VoiceOption> {
    CHINESE_VOICES
        .iter()
        .map(|id| VoiceOption {
            id: id.to_string(),
            label: voice_slug(id),
        })
        .collect()
}

/// File-name-safe short form of a voice identifier.
///
/// `zh-CN-XiaoxiaoNeural` becomes `XiaoxiaoNeural`. Anything outside
/// `[A-Za-z0-9]` collapses to `-`, so the `_` separators of an output id and
/// path separators can never come from a voice name.
pub fn voice_slug(voice: &str) -> String {
    let stripped = LOCALE_PREFIX.replace(voice.trim(), "");
    let slug = UNSAFE_CHARS.replace_all(&stripped, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "voice".to_string()
    } else {
        slug.to_string()
    }
}
