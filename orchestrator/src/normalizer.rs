// orchestrator/src/normalizer.rs

//! Turns a chat-completion envelope into text that has a fair chance of
//! parsing as JSON.
//!
//! Small models often answer with raw newlines inside string values or with
//! over-escaped quotes. [`sanitize`] applies a fixed list of repairs:
//!
//! 1. backspace, form-feed, newline, carriage return, tab and vertical tab
//!    each become one space;
//! 2. every `\"` becomes `"`;
//! 3. every literal `\n` (backslash, `n`) becomes one space;
//! 4. surrounding whitespace is trimmed.
//!
//! This is a best-effort repair, not a JSON un-escaper. A value that really
//! contains the text `\n` loses it.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Content used when the envelope carries no message.
pub const EMPTY_CONTENT: &str = "{}";

static CONTROL_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x08\x0C\n\r\t\x0B]").expect("control character class is a valid regex"));

const ESCAPED_QUOTE: &str = r#"\""#;
const LITERAL_NEWLINE: &str = r"\n";

/// Strict parse of the HTTP body.
pub fn parse_envelope(body: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(body)
}

/// `choices[0].message.content`, or `"{}"` when it is missing.
pub fn extract_content(envelope: &Value) -> String {
    match envelope.pointer("/choices/0/message/content") {
        None | Some(Value::Null) => EMPTY_CONTENT.to_string(),
        Some(Value::String(content)) => content.clone(),
        Some(other) => other.to_string(),
    }
}

pub fn sanitize(content: &str) -> String {
    let mut text = CONTROL_CHARS.replace_all(content, " ").into_owned();
    // `\\"` collapses in two rounds; loop so a second pass finds nothing left.
    while text.contains(ESCAPED_QUOTE) {
        text = text.replace(ESCAPED_QUOTE, "\"");
    }
    text.replace(LITERAL_NEWLINE, " ").trim().to_string()
}

pub fn normalize(envelope: &Value) -> String {
    sanitize(&extract_content(envelope))
}
