//! Optimized-text extraction from provider replies.

use crate::transport::HttpReply;
use crate::{Error, Result};
use serde_json::Value;

/// Fallback fields, tried in order after the OpenAI-style `choices` paths.
const TEXT_FIELDS: &[&str] = &[
    "optimized_text",
    "text",
    "content",
    "response",
    "result",
    "message",
    "data",
];

fn non_empty(v: Option<&Value>) -> Option<String> {
    v.and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// `choices[0].message.content`, then `choices[0].text`, then the first non-empty string
/// among [`TEXT_FIELDS`].
pub fn extract_text(json: &Value) -> Option<String> {
    let first_choice = json.get("choices").and_then(|c| c.get(0));
    if let Some(choice) = first_choice {
        if let Some(text) = non_empty(choice.get("message").and_then(|m| m.get("content"))) {
            return Some(text);
        }
        if let Some(text) = non_empty(choice.get("text")) {
            return Some(text);
        }
    }
    TEXT_FIELDS.iter().find_map(|field| non_empty(json.get(*field)))
}

pub fn looks_like_html(body: &str) -> bool {
    let head: String = body.trim_start().chars().take(512).collect::<String>().to_lowercase();
    head.starts_with("<!doctype html") || head.contains("<html")
}

/// Candidate text from a 2xx reply.
pub fn text_from_reply(reply: &HttpReply) -> Result<String> {
    if reply.is_json() {
        let json: Value = serde_json::from_str(&reply.body)?;
        return extract_text(&json).ok_or_else(|| Error::InvalidResponse {
            message: "no text field in JSON reply".to_string(),
        });
    }

    let body = reply.body.trim();
    if body.is_empty() {
        return Err(Error::InvalidResponse {
            message: "empty body".to_string(),
        });
    }
    if looks_like_html(body) {
        return Err(Error::InvalidResponse {
            message: "HTML document instead of text".to_string(),
        });
    }
    Ok(body.to_string())
}
