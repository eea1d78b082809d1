//! Pulling a JSON payload out of model text.
//!
//! Models wrap their answer in prose, code fences or both. The extractor
//! sanitizes the raw text, locates the first JSON object and parses it.
//! String values are passed through as the model wrote them; an over-long one
//! refuses the whole payload. Schema checks happen afterwards.

use serde_json::{Map, Value};
use thiserror::Error;

/// Maximum raw response length accepted from a model (100KB).
pub const MAX_RESPONSE_LENGTH: usize = 100_000;

/// Maximum length of one string value inside a payload (10KB).
pub const MAX_FIELD_LENGTH: usize = 10_000;

const INJECTION_MARKERS: [&str; 11] = [
    "```system",
    "```assistant",
    "[INST]",
    "[/INST]",
    "<|system|>",
    "<|assistant|>",
    "<|user|>",
    "<|im_start|>",
    "<|im_end|>",
    "<<SYS>>",
    "<</SYS>>",
];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SanitizationError {
    #[error("Response too long: {actual} bytes exceeds maximum of {max} bytes")]
    TooLong { max: usize, actual: usize },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Sanitization failed: {0}")]
    Sanitization(#[from] SanitizationError),

    #[error("No JSON object found in response")]
    NoPayload,

    #[error("JSON parse error: {0}")]
    Parse(String),

    #[error("String value too long: {actual} bytes exceeds maximum of {max} bytes")]
    FieldTooLong { max: usize, actual: usize },
}

/// Cleans raw model text before anything else looks at it.
#[derive(Debug, Clone, Default)]
pub struct ResponseSanitizer {
    extra_markers: Vec<String>,
}

impl ResponseSanitizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds markers to strip on top of the built-in list.
    pub fn with_extra_markers(mut self, markers: Vec<String>) -> Self {
        self.extra_markers = markers;
        self
    }

    /// Caps length, drops control characters (keeping line breaks and tabs)
    /// and strips chat-template markers.
    pub fn sanitize(&self, response: &str) -> Result<String, SanitizationError> {
        if response.len() > MAX_RESPONSE_LENGTH {
            return Err(SanitizationError::TooLong {
                max: MAX_RESPONSE_LENGTH,
                actual: response.len(),
            });
        }

        let mut cleaned: String = response
            .chars()
            .filter(|c| !c.is_control() || matches!(c, '\n' | '\t' | '\r'))
            .collect();

        for marker in INJECTION_MARKERS
            .iter()
            .copied()
            .chain(self.extra_markers.iter().map(String::as_str))
        {
            if !marker.is_empty() {
                cleaned = cleaned.replace(marker, "");
            }
        }
        Ok(cleaned)
    }
}

/// Finds and parses the JSON object a model answered with.
#[derive(Debug, Clone, Default)]
pub struct PayloadExtractor {
    sanitizer: ResponseSanitizer,
}

impl PayloadExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sanitizer(sanitizer: ResponseSanitizer) -> Self {
        Self { sanitizer }
    }

    /// Extracts the first JSON object from `response`.
    ///
    /// # Errors
    ///
    /// - `FieldTooLong` if any string value exceeds [`MAX_FIELD_LENGTH`]
    pub fn extract_object(&self, response: &str) -> Result<Map<String, Value>, ExtractionError> {
        let sanitized = self.sanitizer.sanitize(response)?;
        let candidate = locate_object(&sanitized).ok_or(ExtractionError::NoPayload)?;

        let value: Value =
            serde_json::from_str(candidate).map_err(|e| ExtractionError::Parse(e.to_string()))?;
        check_field_lengths(&value)?;
        match value {
            Value::Object(map) => Ok(map),
            _ => Err(ExtractionError::NoPayload),
        }
    }
}

/// Slice of `text` holding the payload: a fenced block's body if present,
/// otherwise the first balanced `{...}`.
fn locate_object(text: &str) -> Option<&str> {
    let text = text.trim();
    if let Some(body) = fenced_body(text) {
        if body.starts_with('{') {
            return Some(body);
        }
    }
    let start = text.find('{')?;
    balanced_object(text, start)
}

fn fenced_body(text: &str) -> Option<&str> {
    for opener in ["```json", "```JSON", "```"] {
        if let Some(at) = text.find(opener) {
            let after = &text[at + opener.len()..];
            // the opener line may carry nothing else
            let body_start = after.find('\n')? + 1;
            let body = &after[body_start..];
            let end = body.find("```")?;
            return Some(body[..end].trim());
        }
    }
    None
}

fn balanced_object(text: &str, start: usize) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&text[start..start + offset + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

fn check_field_lengths(value: &Value) -> Result<(), ExtractionError> {
    match value {
        Value::String(s) if s.len() > MAX_FIELD_LENGTH => Err(ExtractionError::FieldTooLong {
            max: MAX_FIELD_LENGTH,
            actual: s.len(),
        }),
        Value::Array(items) => items.iter().try_for_each(check_field_lengths),
        Value::Object(map) => map.values().try_for_each(check_field_lengths),
        _ => Ok(()),
    }
}
