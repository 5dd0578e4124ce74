//! Response parser: turns raw model text into a `ResumeRecord`.
//!
//! Never fails: output that is not a JSON object becomes the fallback record,
//! whose `summary` starts with [`FALLBACK_SUMMARY_PREFIX`].

use serde_json::{Map, Value};
use tracing::warn;

use crate::models::resume::{ResumeRecord, PLACEHOLDER};

const FENCE: &str = "```";
const LANGUAGE_TAG: &str = "json";

/// Marks a record produced from unparseable model output.
pub const FALLBACK_SUMMARY_PREFIX: &str = "Extraction failed:";

/// Parses model output into a record, backfilling anything the model left out.
pub fn parse_response(raw: &str) -> ResumeRecord {
    let body = strip_code_fence(raw);

    let parsed = serde_json::from_str::<Value>(body)
        .map_err(|e| e.to_string())
        .and_then(|value| match value {
            Value::Object(map) => Ok(map),
            other => Err(format!("expected a JSON object, got {}", json_kind(&other))),
        });

    match parsed {
        Ok(map) => record_from_map(&map),
        Err(reason) => {
            warn!("Model output is not valid JSON ({reason}): {body}");
            ResumeRecord::fallback(format!("{FALLBACK_SUMMARY_PREFIX} {reason}"))
        }
    }
}

/// Removes a markdown code fence around the output, including a `json` tag.
/// Text that does not start with a fence is only trimmed.
pub fn strip_code_fence(raw: &str) -> &str {
    let text = raw.trim();
    if !text.starts_with(FENCE) {
        return text;
    }
    // Segment between the first pair of fences.
    let inner = text.split(FENCE).nth(1).unwrap_or_default();
    inner.strip_prefix(LANGUAGE_TAG).unwrap_or(inner).trim()
}

fn record_from_map(map: &Map<String, Value>) -> ResumeRecord {
    ResumeRecord {
        name: scalar(map, "name"),
        email: scalar(map, "email"),
        phone: scalar(map, "phone"),
        linkedin: scalar(map, "linkedin"),
        skills: skills(map.get("skills")),
        experience: scalar(map, "experience"),
        education: scalar(map, "education"),
        summary: scalar(map, "summary"),
    }
}

fn scalar(map: &Map<String, Value>, key: &str) -> String {
    let text = match map.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.trim().to_string()),
        Some(Value::Array(items)) => Some(
            items
                .iter()
                .filter_map(value_text)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        Some(other) => Some(other.to_string()),
    };
    text.filter(|t| !t.is_empty())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn skills(value: Option<&Value>) -> Vec<String> {
    let items: Vec<String> = match value {
        Some(Value::Array(items)) => items.iter().filter_map(value_text).collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    };
    // Placeholder strings never end up inside the list.
    items.into_iter().filter(|s| s != PLACEHOLDER).collect()
}

fn value_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
