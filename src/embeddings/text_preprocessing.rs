//! Text preprocessing utilities for embedding generation
//!
//! Normalizes whitespace, drops control characters and bounds the length of
//! text before it is sent to an embedding provider.

use tracing::debug;
use tracing::warn;

use crate::errors::JejuRagError;

/// Longest input (in characters) sent to an embedding provider
pub const MAX_EMBEDDING_CHARS: usize = 2000;

/// Preprocess text for embedding generation
///
/// This function handles:
/// - Normalizing whitespace and newlines
/// - Replacing control characters
/// - Truncating overly long text at a character boundary
pub fn preprocess_text_for_embedding(text: &str) -> Result<String, JejuRagError> {
    let sanitized = sanitize_text(text);

    if sanitized.is_empty() {
        return Err(JejuRagError::EmbeddingService(
            "Text contains only whitespace after preprocessing".to_string(),
        ));
    }

    let char_count = sanitized.chars().count();
    if char_count > MAX_EMBEDDING_CHARS {
        warn!(
            "Text too long ({} chars), truncating to {}",
            char_count, MAX_EMBEDDING_CHARS
        );
        return Ok(smart_truncate_text(&sanitized, MAX_EMBEDDING_CHARS));
    }

    debug!(
        "Preprocessed text: {} -> {} bytes",
        text.len(),
        sanitized.len()
    );
    Ok(sanitized)
}

/// Replace control characters (including newlines and tabs) with spaces and
/// collapse runs of whitespace
fn sanitize_text(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}

/// Truncate to `max_chars`, preferring the last word boundary in the final fifth
fn smart_truncate_text(text: &str, max_chars: usize) -> String {
    let truncated: String = text.chars().take(max_chars).collect();
    match truncated.rfind(' ') {
        Some(pos) if truncated[..pos].chars().count() >= max_chars * 4 / 5 => {
            truncated[..pos].to_string()
        }
        _ => truncated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newlines_become_spaces() {
        let out = preprocess_text_for_embedding("장소명: 우도\n주소: 제주시\t우도면").unwrap();
        assert_eq!(out, "장소명: 우도 주소: 제주시 우도면");
    }

    #[test]
    fn test_whitespace_only_is_error() {
        assert!(preprocess_text_for_embedding(" \n\t ").is_err());
        assert!(preprocess_text_for_embedding("").is_err());
    }

    #[test]
    fn test_long_text_is_truncated_on_char_boundary() {
        let text = "한라산 ".repeat(1000);
        let out = preprocess_text_for_embedding(&text).unwrap();
        assert!(out.chars().count() <= MAX_EMBEDDING_CHARS);
        assert!(out.ends_with("한라산"));
    }
}
