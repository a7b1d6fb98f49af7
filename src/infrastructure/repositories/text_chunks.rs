use regex::Regex;
use std::sync::LazyLock;

/// Sentence-ending punctuation, Latin and CJK, with any trailing whitespace
static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?。！？；;…]+\s*").expect("valid sentence pattern"));

/// Split text into chunks that respect sentence boundaries.
/// Each chunk is at most `max_bytes` UTF-8 bytes.
pub fn split_into_chunks(text: &str, max_bytes: usize) -> Vec<String> {
    if text.len() <= max_bytes {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut last_end = 0;

    for mat in SENTENCE_END.find_iter(text) {
        let sentence = &text[last_end..mat.end()];
        push_piece(&mut chunks, &mut current, sentence, max_bytes);
        last_end = mat.end();
    }

    // Remaining text after the last sentence boundary
    if last_end < text.len() {
        push_piece(&mut chunks, &mut current, &text[last_end..], max_bytes);
    }

    flush(&mut chunks, &mut current);
    chunks
}

fn push_piece(chunks: &mut Vec<String>, current: &mut String, piece: &str, max_bytes: usize) {
    if !current.is_empty() && current.len() + piece.len() > max_bytes {
        flush(chunks, current);
    }

    if piece.len() > max_bytes {
        // No usable boundary: cut on character boundaries
        for part in hard_split(piece, max_bytes) {
            chunks.push(part);
        }
    } else {
        current.push_str(piece);
    }
}

fn flush(chunks: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
    current.clear();
}

fn hard_split(text: &str, max_bytes: usize) -> Vec<String> {
    let mut parts = Vec::new();
    let mut part = String::new();
    for ch in text.chars() {
        if part.len() + ch.len_utf8() > max_bytes && !part.is_empty() {
            push_non_blank(&mut parts, std::mem::take(&mut part));
        }
        part.push(ch);
    }
    push_non_blank(&mut parts, part);
    parts
}

/// Engines return no audio for whitespace-only input
fn push_non_blank(parts: &mut Vec<String>, part: String) {
    if !part.trim().is_empty() {
        parts.push(part);
    }
}
