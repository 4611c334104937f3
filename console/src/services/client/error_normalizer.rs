//! Maps arbitrary backend failure payloads onto one [`NormalizedError`].
//!
//! The body shape is resolved once into an [`ErrorBody`]; precedence is
//! field errors, then the first known message key, then a plain-string body,
//! then the status line, then a generic message. Field errors win even when a
//! message key is present as well.

use serde_json::{Map, Value};

use super::errors::{ErrorKind, NormalizedError, GENERIC_MESSAGE};
use super::transport::ApiResponse;

/// Top-level keys that carry a single human-readable message, in priority order
pub const MESSAGE_KEYS: [&str; 4] = ["reason", "error", "detail", "message"];

/// Resolved shape of a failed response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorBody {
    /// One formatted `field: values` line per field
    Validation(Vec<String>),
    /// Value of a known message key
    Message(String),
    /// The body itself was a string
    Text(String),
    Unknown,
}

impl ErrorBody {
    pub fn classify(body: &Value) -> Self {
        match body {
            Value::Object(map) => {
                let lines = field_lines(map);
                if !lines.is_empty() {
                    return ErrorBody::Validation(lines);
                }
                MESSAGE_KEYS
                    .iter()
                    .find_map(|key| map.get(*key).and_then(message_text))
                    .map(ErrorBody::Message)
                    .unwrap_or(ErrorBody::Unknown)
            }
            Value::String(text) if !text.trim().is_empty() => ErrorBody::Text(text.trim().to_string()),
            _ => ErrorBody::Unknown,
        }
    }
}

/// Normalize a failed call; `None` means no response was received
pub fn normalize(response: Option<&ApiResponse>) -> NormalizedError {
    let Some(response) = response else {
        return NormalizedError::network();
    };
    let status = Some(response.status);

    match ErrorBody::classify(&response.body) {
        ErrorBody::Validation(lines) => {
            NormalizedError::new(ErrorKind::Validation, lines.join("; "), status)
        }
        ErrorBody::Message(message) | ErrorBody::Text(message) => {
            NormalizedError::new(ErrorKind::Domain, message, status)
        }
        ErrorBody::Unknown => match status_line(response.status) {
            Some(line) => NormalizedError::fallback(ErrorKind::Unknown, line, status),
            None => NormalizedError::fallback(ErrorKind::Unknown, GENERIC_MESSAGE, status),
        },
    }
}

fn status_line(status: u16) -> Option<String> {
    (100..=599)
        .contains(&status)
        .then(|| format!("Request failed with status code {}", status))
}

fn field_lines(map: &Map<String, Value>) -> Vec<String> {
    let mut lines = Vec::new();
    for (field, value) in map {
        if MESSAGE_KEYS.contains(&field.as_str()) {
            continue;
        }
        match value {
            Value::Object(nested) => {
                for (nested_field, nested_value) in nested {
                    if let Some(text) = message_text(nested_value) {
                        lines.push(format!("{}.{}: {}", field, nested_field, text));
                    }
                }
            }
            other => {
                if let Some(text) = message_text(other) {
                    lines.push(format!("{}: {}", field, text));
                }
            }
        }
    }
    lines
}

/// A non-empty string, or the non-empty strings of a list joined with ", "
fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Array(items) => {
            let parts: Vec<&str> = items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        _ => None,
    }
}
