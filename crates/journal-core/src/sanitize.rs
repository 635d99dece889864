//! Text sanitization
//!
//! Every free-text field is HTML-escaped and whitespace-normalized before
//! it is stored, so stored entries are safe to render verbatim.

use serde::{Deserialize, Serialize};

/// Escape HTML-significant characters and normalize whitespace
///
/// `&`, `<`, `>`, `"` and `'` become named entities, every whitespace run
/// (newlines included) collapses to one space, and the result is trimmed.
pub fn sanitize_text(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `sanitize_text` for an optional value; `None` yields an empty string
pub fn sanitize_opt(raw: Option<&str>) -> String {
    raw.map(sanitize_text).unwrap_or_default()
}

/// Tags as supplied by a caller: a comma-separated string or a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagsInput {
    Text(String),
    List(Vec<String>),
}

impl TagsInput {
    /// The raw text form used for required-field and length checks
    ///
    /// Lists are joined with commas.
    pub fn raw_text(&self) -> String {
        match self {
            TagsInput::Text(s) => s.clone(),
            TagsInput::List(items) => items.join(","),
        }
    }
}

impl From<&str> for TagsInput {
    fn from(s: &str) -> Self {
        TagsInput::Text(s.to_string())
    }
}

impl From<String> for TagsInput {
    fn from(s: String) -> Self {
        TagsInput::Text(s)
    }
}

impl From<Vec<String>> for TagsInput {
    fn from(items: Vec<String>) -> Self {
        TagsInput::List(items)
    }
}

/// Turn raw tags into sanitized, lower-cased tags, preserving order
///
/// Empty tags are dropped. Duplicates are kept.
pub fn normalize_tags(raw: Option<&TagsInput>) -> Vec<String> {
    match raw {
        None => Vec::new(),
        Some(TagsInput::List(items)) => items
            .iter()
            .map(|tag| sanitize_text(tag).to_lowercase())
            .filter(|tag| !tag.is_empty())
            .collect(),
        Some(TagsInput::Text(text)) => sanitize_text(text)
            .split(',')
            .map(|tag| tag.trim().to_lowercase())
            .filter(|tag| !tag.is_empty())
            .collect(),
    }
}
