//! Parsing boundary for model output.
//!
//! Nothing leaves this module unvalidated: a response either deserializes
//! into the requested shape or is returned as [`ParseOutcome::ParseError`]
//! together with the raw text.

use serde::de::DeserializeOwned;

/// Result of interpreting model text as structured data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome<T> {
    Parsed(T),
    ParseError(String),
}

/// Strip markdown code fences and keep only the outermost JSON value.
///
/// The slice runs from the first `{` or `[` to the last matching closer, so
/// prose before or after the JSON is dropped.
#[must_use]
pub fn clean_json_text(raw: &str) -> &str {
    let text = raw
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```JSON")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let Some(start) = text.find(|c: char| c == '{' || c == '[') else {
        return text;
    };
    let closer = if text[start..].starts_with('{') { '}' } else { ']' };
    match text.rfind(closer) {
        Some(end) if end > start => &text[start..=end],
        _ => &text[start..],
    }
}

/// Clean `raw` and deserialize it as `T`.
pub fn parse_json<T: DeserializeOwned>(raw: &str) -> ParseOutcome<T> {
    let cleaned = clean_json_text(raw);
    if cleaned.is_empty() {
        return ParseOutcome::ParseError(raw.to_string());
    }
    match serde_json::from_str(cleaned) {
        Ok(value) => ParseOutcome::Parsed(value),
        Err(_) => ParseOutcome::ParseError(raw.to_string()),
    }
}

/// Truncate to at most `max_chars` characters.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
