//! Tolerant parsing of narrative responses.
//!
//! The expected body is a JSON object `{"narrative": "...", "delta": {...}}`,
//! possibly wrapped in a fenced code block or surrounded by chatter. When no
//! such object can be found, the whole body becomes the narrative and no
//! state changes are applied.

use game_state::{NarrativeOutcome, TurnDelta};
use serde_json::Value;

/// Format instructions appended to prompts.
pub const RESPONSE_FORMAT: &str = r#"Reply with a single JSON object:
{"narrative": "<story text>", "delta": {"statChanges": {"STAT": number}, "moneyChange": number, "locationChange": "place", "relationshipChanges": {"Name": {"trust": number, "attraction": number, "familiarity": number}}, "itemsGained": ["item_id"]}}
Omit any delta field that does not change."#;

/// Parse a raw collaborator response.
pub fn parse_response(raw: &str) -> NarrativeOutcome {
    match find_object(raw) {
        Some(object) => outcome_from_object(object),
        None => {
            tracing::warn!(
                target: "narrative_core::response",
                len = raw.len(),
                "response is not structured, using raw text"
            );
            NarrativeOutcome::text(raw)
        }
    }
}

/// Locate a JSON object with a string `narrative` field.
fn find_object(raw: &str) -> Option<serde_json::Map<String, Value>> {
    let trimmed = strip_fences(raw.trim());

    let candidates = [
        Some(trimmed),
        match (trimmed.find('{'), trimmed.rfind('}')) {
            (Some(start), Some(end)) if start < end => Some(&trimmed[start..=end]),
            _ => None,
        },
    ];

    candidates.into_iter().flatten().find_map(|text| {
        match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) if map.get("narrative").is_some_and(Value::is_string) => {
                Some(map)
            }
            _ => None,
        }
    })
}

fn outcome_from_object(mut object: serde_json::Map<String, Value>) -> NarrativeOutcome {
    let narrative = match object.remove("narrative") {
        Some(Value::String(text)) => text,
        _ => String::new(),
    };

    let delta = match object.remove("delta") {
        None | Some(Value::Null) => Some(TurnDelta::default()),
        Some(value) => match serde_json::from_value::<TurnDelta>(value) {
            Ok(delta) => Some(delta),
            Err(err) => {
                tracing::warn!(
                    target: "narrative_core::response",
                    error = %err,
                    "delta does not match the expected schema, skipping it"
                );
                None
            }
        },
    };

    NarrativeOutcome { narrative, delta }
}

/// Remove a surrounding ```` ``` ```` fence, with or without a language tag.
fn strip_fences(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
