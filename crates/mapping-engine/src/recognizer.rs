//! Recognizer boundary
//!
//! The recognizer is a remote vision service that reads codes and amounts
//! off a page image. This module holds the trait the pipeline calls and the
//! parser for the service's reply.

use crate::error::RecognizerError;
use serde_json::Value;
use shared_types::PageExtraction;
use std::path::Path;

/// Reads code -> raw value pairs from one page image
pub trait Recognizer {
    fn recognize(&self, image: &Path) -> Result<PageExtraction, RecognizerError>;
}

/// Parse the recognizer's reply text into a page extraction.
///
/// Accepts a bare JSON object or one wrapped in a markdown code fence
/// (optionally tagged `json`). String and numeric values are kept, nulls are
/// skipped.
pub fn parse_recognizer_reply(content: &str) -> Result<PageExtraction, RecognizerError> {
    let body = strip_code_fence(content.trim());

    let value: Value = serde_json::from_str(body)?;
    let Value::Object(object) = value else {
        return Err(RecognizerError::MalformedReply(format!(
            "expected a JSON object, got: {}",
            preview(body)
        )));
    };

    let mut page = PageExtraction::new();
    for (code, value) in object {
        match value {
            Value::String(s) => page.insert(&code, s),
            Value::Number(n) => page.insert(&code, n.to_string()),
            Value::Null => continue,
            other => {
                return Err(RecognizerError::MalformedReply(format!(
                    "value for code {} is not a string or number: {}",
                    code, other
                )))
            }
        }
    }
    Ok(page)
}

fn strip_code_fence(content: &str) -> &str {
    let Some(rest) = content.strip_prefix("```") else {
        return content;
    };
    let inner = match rest.find("```") {
        Some(end) => &rest[..end],
        None => rest,
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.trim()
}

fn preview(body: &str) -> String {
    body.chars().take(80).collect()
}
