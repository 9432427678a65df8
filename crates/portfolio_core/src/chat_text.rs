//! crates/portfolio_core/src/chat_text.rs
//!
//! Turns assistant message payloads into display text and transcript order.

use crate::domain::ChatMessage;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

fn citation_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"【[0-9]+:[0-9]+†source】").expect("citation pattern is valid"))
}

/// Removes every `【<digits>:<digits>†source】` citation marker. Digits are ASCII only.
pub fn strip_citations(text: &str) -> String {
    citation_marker().replace_all(text, "").into_owned()
}

/// Normalizes a message `content` payload to plain text.
///
/// Accepts a bare string or a segment array whose first element carries
/// `text.value`. Anything else is rendered as JSON (objects, arrays) or as its
/// scalar form.
pub fn normalize_content(content: &Value) -> String {
    let text = match content {
        Value::String(text) => text.clone(),
        Value::Array(segments) => match segments
            .first()
            .and_then(|segment| segment.pointer("/text/value"))
            .and_then(Value::as_str)
        {
            Some(value) => value.to_string(),
            None => content.to_string(),
        },
        Value::Object(_) | Value::Number(_) | Value::Bool(_) | Value::Null => content.to_string(),
    };
    strip_citations(&text)
}

/// Converts a newest-first listing into an oldest-first transcript.
pub fn chronological(mut newest_first: Vec<ChatMessage>) -> Vec<ChatMessage> {
    newest_first.reverse();
    newest_first
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Sender;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn citation_markers_need_ascii_digits() {
        let text = "a【١:٢†source】b";
        assert_eq!(strip_citations(text), text);
        assert_eq!(strip_citations("a【:1†source】b"), "a【:1†source】b");
    }

    #[test]
    fn citation_markers_are_removed() {
        assert_eq!(normalize_content(&json!("Answer【12:3†source】.")), "Answer.");
        assert_eq!(
            strip_citations("a【1:2†source】b【30:40†source】c"),
            "abc"
        );
        // Not a marker: missing digits.
        assert_eq!(strip_citations("x【:†source】"), "x【:†source】");
    }

    #[test]
    fn segment_arrays_use_the_first_text_value() {
        let content = json!([
            { "type": "text", "text": { "value": "Hello【4:0†source】 there", "annotations": [] } },
            { "type": "text", "text": { "value": "ignored" } }
        ]);
        assert_eq!(normalize_content(&content), "Hello there");
    }

    #[test]
    fn unknown_shapes_render_as_json() {
        assert_eq!(normalize_content(&json!({ "a": 1 })), r#"{"a":1}"#);
        assert_eq!(normalize_content(&json!([1, 2])), "[1,2]");
        assert_eq!(normalize_content(&json!(7)), "7");
        assert_eq!(normalize_content(&Value::Null), "null");
    }

    #[test]
    fn listing_is_reversed_into_chronological_order() {
        let at = |secs| Utc.timestamp_opt(secs, 0).single().unwrap();
        let message = |id: &str, secs| ChatMessage {
            id: id.to_string(),
            text: id.to_string(),
            sender: Sender::Assistant,
            timestamp: at(secs),
        };
        let newest_first = vec![message("c", 30), message("b", 20), message("a", 10)];
        let transcript = chronological(newest_first);
        let ids: Vec<&str> = transcript.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
