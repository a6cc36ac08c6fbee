//! Layered recovery of a JSON object from generative-model output
//!
//! Each layer runs only when the previous one failed:
//!
//! - layer 0: parse the text verbatim
//! - layer 1: strip code fences and surrounding prose, keep `{ ... }`
//! - layer 2: normalize smart quotes, drop control characters, remove
//!   trailing commas
//!
//! A failure after layer 2 is terminal and carries a snippet of the cleaned
//! text for debugging.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::error::{ContentError, Result};
use crate::http::truncate_chars;

/// Characters of the cleaned text quoted in a parse error
pub const ERROR_SNIPPET_CHARS: usize = 800;

static LEADING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^```[a-zA-Z0-9_-]*\n?").expect("valid fence regex"));

static TRAILING_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*([\]}])").expect("valid trailing comma regex"));

/// Which layer produced the object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    Direct,
    Sanitized,
}

/// Parse `text` into a JSON object, trying each recovery layer in turn
pub fn parse_object(text: &str) -> Result<(Map<String, Value>, Recovery)> {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(text) {
        return Ok((map, Recovery::Direct));
    }

    tracing::debug!("Direct parse failed, extracting and sanitizing");

    let cleaned = sanitize(&extract_block(text));
    match serde_json::from_str::<Value>(&cleaned) {
        Ok(Value::Object(map)) => Ok((map, Recovery::Sanitized)),
        Ok(_) => Err(ContentError::NotAnObject.into()),
        Err(source) => Err(ContentError::Parse {
            snippet: truncate_chars(&cleaned, ERROR_SNIPPET_CHARS),
            source,
        }
        .into()),
    }
}

/// Layer 1: drop code fences and keep the span from the first `{` to the last `}`
///
/// Text without such a span is returned fence-stripped but otherwise as is.
pub fn extract_block(text: &str) -> String {
    let mut t = text.trim();

    let unfenced;
    if t.starts_with("```") {
        unfenced = LEADING_FENCE.replace(t, "").into_owned();
        t = unfenced.trim_end().trim_end_matches('`').trim();
    }

    match (t.find('{'), t.rfind('}')) {
        (Some(start), Some(end)) if end > start => t[start..=end].to_string(),
        _ => t.to_string(),
    }
}

/// Layer 2: repair the small syntax slips models make
pub fn sanitize(candidate: &str) -> String {
    let normalized: String = candidate
        .chars()
        .map(|ch| match ch {
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            other => other,
        })
        .filter(|&ch| ch == '\t' || ch as u32 >= 32)
        .collect();

    TRAILING_COMMA.replace_all(&normalized, "$1").into_owned()
}
