//! Criteria Extractor: best-effort pattern matching over the operator query.
//!
//! Each phrase is matched independently and case-insensitively. A miss means
//! "no constraint", never an error.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

use crate::screening::models::ScreeningCriteria;

static THRESHOLD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)ATS\s*score\s*more\s*than\s*(\d+)").expect("threshold pattern is valid")
});

static INSTITUTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)graduated\s*from\s*top\s*institutions\s*like\s*([^,]+)")
        .expect("institution pattern is valid")
});

pub fn extract_criteria(query: &str) -> ScreeningCriteria {
    let score_threshold = extract_threshold(query);
    if score_threshold.is_none() {
        info!("No ATS score threshold found in query; not constraining on score");
    }

    let required_institution = extract_institution(query);
    if required_institution.is_none() {
        info!("No required institution found in query; not constraining on college");
    }

    ScreeningCriteria {
        score_threshold,
        required_institution,
    }
}

/// "ATS score more than <integer>"
pub fn extract_threshold(query: &str) -> Option<f64> {
    THRESHOLD
        .captures(query)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// "graduated from top institutions like <text up to the next comma>"
pub fn extract_institution(query: &str) -> Option<String> {
    INSTITUTION
        .captures(query)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_extracted() {
        assert_eq!(
            extract_threshold("Screen the resumes with ATS score more than 40"),
            Some(40.0)
        );
    }

    #[test]
    fn test_threshold_with_percent_sign_and_case() {
        assert_eq!(extract_threshold("ats SCORE more  than 65%, please"), Some(65.0));
    }

    #[test]
    fn test_threshold_absent_is_none_not_zero() {
        assert_eq!(extract_threshold("Find strong backend engineers"), None);
        assert_eq!(extract_threshold("ATS score above 40"), None);
    }

    #[test]
    fn test_institution_stops_at_first_comma() {
        assert_eq!(
            extract_institution("graduated from top institutions like Foo University, and more"),
            Some("Foo University".to_string())
        );
    }

    #[test]
    fn test_institution_runs_to_end_without_comma() {
        assert_eq!(
            extract_institution(
                "Screen the resumes with ATS score more than 40%, who have graduated from top institutions like Meghnad Saha Institute of Technology  "
            ),
            Some("Meghnad Saha Institute of Technology".to_string())
        );
    }

    #[test]
    fn test_criteria_are_order_insensitive() {
        let criteria = extract_criteria(
            "Graduated from top institutions like IIT Bombay, ATS score more than 70",
        );
        assert_eq!(criteria.score_threshold, Some(70.0));
        assert_eq!(criteria.required_institution.as_deref(), Some("IIT Bombay"));
    }

    #[test]
    fn test_unmatched_query_has_no_constraints() {
        assert_eq!(
            extract_criteria("Anyone who knows Kubernetes"),
            ScreeningCriteria::default()
        );
    }
}
