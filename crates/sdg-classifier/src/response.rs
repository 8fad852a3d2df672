//! Provider response parsing and candidate validation.
//!
//! Nothing about the response shape is trusted. The text is reduced to a JSON
//! value (tolerating Markdown fences and surrounding prose), then every entry
//! is validated on its own: a bad entry is dropped, never fatal.

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::debug;

use sdg_core::models::impact::ImpactCandidate;

use crate::error::ClassifierError;

const GOAL_KEYS: [&str; 3] = ["sdg_number", "goal_number", "goal"];
const SCORE_KEYS: [&str; 2] = ["relevance_score", "score"];
const JUSTIFICATION_KEY: &str = "justification";

/// Candidates that survived validation, in provider order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedResponse {
    pub candidates: Vec<ImpactCandidate>,
    /// Entries dropped as malformed, out of range, or duplicate.
    pub rejected: usize,
}

/// Parse a raw provider reply into validated candidates.
///
/// Fails only when no JSON value or no list of entries can be recovered at
/// all; individual bad entries are counted in `rejected`.
pub fn parse_response(text: &str) -> Result<ParsedResponse, ClassifierError> {
    let value = extract_json(text)?;
    let entries = impact_entries(&value)?;

    let mut parsed = ParsedResponse::default();
    let mut seen = HashSet::new();

    for entry in entries {
        match validate_entry(entry) {
            Some(candidate) if seen.insert(candidate.goal_number) => {
                parsed.candidates.push(candidate);
            }
            Some(candidate) => {
                debug!(goal = %candidate.goal_number, "dropping duplicate goal");
                parsed.rejected += 1;
            }
            None => {
                debug!(entry = %entry, "dropping invalid impact entry");
                parsed.rejected += 1;
            }
        }
    }

    Ok(parsed)
}

/// Order candidates by score, highest first, and keep the top `max_results`.
///
/// The sort is stable: equal scores keep provider order.
pub fn rank(mut candidates: Vec<ImpactCandidate>, max_results: usize) -> Vec<ImpactCandidate> {
    candidates.sort_by(|a, b| b.score.cmp(&a.score));
    candidates.truncate(max_results);
    candidates
}

fn extract_json(text: &str) -> Result<Value, ClassifierError> {
    let unfenced = strip_code_fence(text.trim());

    if let Ok(value) = serde_json::from_str::<Value>(unfenced) {
        return Ok(value);
    }

    // Fall back to the outermost object, then the outermost array.
    for (open, close) in [('{', '}'), ('[', ']')] {
        if let (Some(start), Some(end)) = (unfenced.find(open), unfenced.rfind(close))
            && start < end
            && let Ok(value) = serde_json::from_str::<Value>(&unfenced[start..=end])
        {
            return Ok(value);
        }
    }

    Err(ClassifierError::ResponseParse(
        "could not extract valid JSON from response".to_string(),
    ))
}

fn strip_code_fence(text: &str) -> &str {
    let body = if let Some((_, rest)) = text.split_once("```json") {
        rest
    } else if let Some((_, rest)) = text.split_once("```") {
        rest
    } else {
        return text;
    };
    body.split("```").next().unwrap_or(body).trim()
}

fn impact_entries(value: &Value) -> Result<&[Value], ClassifierError> {
    match value {
        Value::Array(entries) => Ok(entries),
        Value::Object(obj) => match obj.get("impacts") {
            Some(Value::Array(entries)) => Ok(entries),
            Some(_) => Err(ClassifierError::ResponseParse(
                "'impacts' must be a list".to_string(),
            )),
            None => Err(ClassifierError::ResponseParse(
                "response JSON must contain an 'impacts' key".to_string(),
            )),
        },
        _ => Err(ClassifierError::ResponseParse(
            "response JSON is neither an object nor a list".to_string(),
        )),
    }
}

fn validate_entry(entry: &Value) -> Option<ImpactCandidate> {
    let obj = entry.as_object()?;
    let goal = integer_field(obj, &GOAL_KEYS)?;
    let score = integer_field(obj, &SCORE_KEYS)?;
    let justification = obj.get(JUSTIFICATION_KEY)?.as_str()?;
    ImpactCandidate::new(goal, score, justification.trim()).ok()
}

// Floats and numeric strings are not integers and are rejected.
fn integer_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<i64> {
    keys.iter().find_map(|k| obj.get(*k)).and_then(Value::as_i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fence() {
        let text = "Here you go:\n```json\n{\"impacts\": []}\n```\nThanks";
        assert_eq!(strip_code_fence(text), "{\"impacts\": []}");
    }

    #[test]
    fn strips_bare_fence() {
        let text = "```\n[1, 2]\n```";
        assert_eq!(strip_code_fence(text), "[1, 2]");
    }

    #[test]
    fn extracts_object_from_prose() {
        let text = "Sure! {\"impacts\": [{\"sdg_number\": 4}]} Let me know.";
        let value = extract_json(text).unwrap();
        assert!(value.get("impacts").is_some());
    }

    #[test]
    fn no_json_is_an_error() {
        assert!(matches!(
            extract_json("I cannot help with that."),
            Err(ClassifierError::ResponseParse(_))
        ));
    }

    #[test]
    fn float_score_is_not_an_integer() {
        let entry = serde_json::json!({"sdg_number": 3, "relevance_score": 72.5, "justification": "x"});
        assert!(validate_entry(&entry).is_none());
    }
}
