// SPDX-FileCopyrightText: 2026 Semrouter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt extraction from OpenAI-style request bodies.
//!
//! A `messages` array is authoritative: the last `user` message with usable
//! content is the prompt, and when there is none the body has no prompt.
//! Only without a `messages` array are `prompt`, then `input`, consulted.
//! Whitespace-only text is not usable.

use serde_json::Value;
use tracing::debug;

/// Extract the prompt text from a raw JSON body.
///
/// Returns `None` when the body is not JSON or carries no usable text; the
/// caller forwards such requests unrouted.
pub fn extract_prompt(body: &[u8]) -> Option<String> {
    if body.is_empty() {
        return None;
    }
    let root: Value = match serde_json::from_slice(body) {
        Ok(v) => v,
        Err(e) => {
            debug!(error = %e, "request body is not valid JSON");
            return None;
        }
    };

    if let Some(messages) = root.get("messages").and_then(Value::as_array) {
        return last_user_message(messages);
    }
    root.get("prompt")
        .and_then(text_of)
        .or_else(|| root.get("input").and_then(text_of))
}

fn last_user_message(messages: &[Value]) -> Option<String> {
    messages
        .iter()
        .rev()
        .filter(|m| m.get("role").and_then(Value::as_str) == Some("user"))
        .find_map(|m| m.get("content").and_then(text_of))
}

/// Usable text from a string, or from an array of strings / text parts.
fn text_of(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(|part| match part {
                Value::String(s) => Some(s.as_str()),
                Value::Object(_) => part
                    .get("text")
                    .or_else(|| part.get("content"))
                    .and_then(Value::as_str),
                _ => None,
            })
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        _ => return None,
    };
    (!text.trim().is_empty()).then_some(text)
}
