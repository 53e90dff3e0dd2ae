//! Response Normalizer: turns a free-text model reply into an `EvaluationResult`.
//!
//! Never fails: a reply that is not a JSON object becomes the `ParsingError`
//! fallback record so the batch keeps going.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::warn;

use crate::screening::models::{EvaluationResult, Field, Verdict};

const FENCE: &str = "```";

pub const KEY_MATCH: &str = "Match";
pub const KEY_ATS_SCORE: &str = "ATS Score";
pub const KEY_COLLEGE: &str = "College";
pub const KEY_CGPA: &str = "CGPA";
pub const KEY_CERTIFICATIONS: &str = "Certifications";
pub const KEY_EMAIL: &str = "Candidate Email";

static PERCENTAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(\.\d+)?)\s*%").expect("percentage pattern is valid"));

/// A normalized reply: the de-fenced text and the record parsed from it.
#[derive(Debug, Clone)]
pub struct NormalizedReply {
    pub cleaned: String,
    pub evaluation: EvaluationResult,
}

/// Strips a surrounding code fence.
///
/// If the trimmed text starts with a fence, its first line (the fence plus any
/// language tag) is dropped, and so is the last line when it is a fence too.
pub fn strip_code_fences(raw: &str) -> String {
    let cleaned = raw.trim();
    if !cleaned.starts_with(FENCE) {
        return cleaned.to_string();
    }

    let mut lines: Vec<&str> = cleaned.lines().skip(1).collect();
    if lines.last().is_some_and(|line| line.starts_with(FENCE)) {
        lines.pop();
    }
    lines.join("\n")
}

pub fn normalize_reply(raw: &str) -> NormalizedReply {
    let cleaned = strip_code_fences(raw);

    let evaluation = match serde_json::from_str::<Value>(&cleaned) {
        Ok(Value::Object(map)) => {
            let mut evaluation = evaluation_from_map(&map);
            if !evaluation.ats_score.is_available() {
                if let Some(percent) = first_percentage(&cleaned) {
                    evaluation.ats_score = Field::Present(percent);
                }
            }
            evaluation
        }
        Ok(other) => {
            warn!("Model reply is JSON but not an object ({})", json_kind(&other));
            EvaluationResult::parsing_error()
        }
        Err(e) => {
            warn!("Failed to parse model reply as JSON: {e}");
            EvaluationResult::parsing_error()
        }
    };

    NormalizedReply {
        cleaned,
        evaluation,
    }
}

fn evaluation_from_map(map: &Map<String, Value>) -> EvaluationResult {
    let field = |key: &str| map.get(key).map(Field::from_json).unwrap_or_default();

    let verdict = match map.get(KEY_MATCH).and_then(Value::as_str) {
        Some(m) if m.trim().eq_ignore_ascii_case("yes") => Verdict::Yes,
        _ => Verdict::No,
    };

    EvaluationResult {
        verdict,
        ats_score: field(KEY_ATS_SCORE),
        college: field(KEY_COLLEGE),
        cgpa: field(KEY_CGPA),
        certifications: field(KEY_CERTIFICATIONS),
        candidate_email: field(KEY_EMAIL),
    }
}

/// First `<number>%` in the text, without the percent sign.
fn first_percentage(text: &str) -> Option<String> {
    PERCENTAGE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
