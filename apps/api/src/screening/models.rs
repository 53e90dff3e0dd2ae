use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Placeholder the model (and the export) uses for missing values.
pub const NOT_AVAILABLE: &str = "N/A";

/// A value reported by the model, or the "N/A" sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Field {
    Present(String),
    #[default]
    NotAvailable,
}

impl Field {
    /// Trimmed text; blank or "N/A" (any case) becomes `NotAvailable`.
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NOT_AVAILABLE) {
            Field::NotAvailable
        } else {
            Field::Present(trimmed.to_string())
        }
    }

    /// Coerces any JSON value to a field: numbers are printed, arrays joined with ", ".
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Field::NotAvailable,
            Value::String(s) => Field::from_text(s),
            Value::Number(n) => Field::Present(n.to_string()),
            Value::Bool(b) => Field::Present(b.to_string()),
            Value::Array(items) => {
                let joined: Vec<String> = items
                    .iter()
                    .filter_map(|item| match Field::from_json(item) {
                        Field::Present(s) => Some(s),
                        Field::NotAvailable => None,
                    })
                    .collect();
                Field::from_text(&joined.join(", "))
            }
            Value::Object(_) => Field::Present(value.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Field::Present(s) => s,
            Field::NotAvailable => NOT_AVAILABLE,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Field::Present(_))
    }

    /// Numeric reading of the field; anything unparseable counts as 0.
    pub fn as_number(&self) -> f64 {
        match self {
            Field::Present(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            Field::NotAvailable => 0.0,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Field::from_json(&value))
    }
}

/// Whether a resume satisfies the screening query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Yes,
    No,
    #[serde(rename = "Parsing Error")]
    ParsingError,
}

/// The model's assessment of one resume, after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub verdict: Verdict,
    pub ats_score: Field,
    pub college: Field,
    pub cgpa: Field,
    pub certifications: Field,
    pub candidate_email: Field,
}

impl EvaluationResult {
    /// Substituted when the model reply cannot be parsed.
    pub fn parsing_error() -> Self {
        Self {
            verdict: Verdict::ParsingError,
            ats_score: Field::NotAvailable,
            college: Field::NotAvailable,
            cgpa: Field::NotAvailable,
            certifications: Field::NotAvailable,
            candidate_email: Field::NotAvailable,
        }
    }
}

/// Constraints pulled out of the operator's free-text query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreeningCriteria {
    pub score_threshold: Option<f64>,
    pub required_institution: Option<String>,
}

/// One exported line: a resume that passed screening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub file_name: String,
    pub ats_score: Field,
    pub college: Field,
    pub cgpa: Field,
    pub certifications: Field,
    pub candidate_email: Field,
}

impl ReportRow {
    pub fn new(file_name: &str, evaluation: &EvaluationResult) -> Self {
        Self {
            file_name: file_name.to_string(),
            ats_score: evaluation.ats_score.clone(),
            college: evaluation.college.clone(),
            cgpa: evaluation.cgpa.clone(),
            certifications: evaluation.certifications.clone(),
            candidate_email: evaluation.candidate_email.clone(),
        }
    }
}
