//! Filter/Override Engine.
//!
//! The model's own "does this meet the query" answer is unreliable for compound
//! numeric and textual constraints, so a non-`Yes` verdict is re-derived from the
//! extracted criteria. A `Yes` from the model is never downgraded.

use crate::screening::models::{EvaluationResult, ScreeningCriteria, Verdict};

/// Applies the override rule in place. Returns `true` when the verdict was flipped to `Yes`.
pub fn apply_criteria(evaluation: &mut EvaluationResult, criteria: &ScreeningCriteria) -> bool {
    if evaluation.verdict == Verdict::Yes {
        return false;
    }

    let Some(threshold) = criteria.score_threshold else {
        return false;
    };

    if evaluation.ats_score.as_number() < threshold {
        return false;
    }

    let institution_ok = match &criteria.required_institution {
        None => true,
        Some(required) => evaluation
            .college
            .as_str()
            .to_lowercase()
            .contains(&required.to_lowercase()),
    };

    if institution_ok {
        evaluation.verdict = Verdict::Yes;
    }
    institution_ok
}

pub fn passes(evaluation: &EvaluationResult) -> bool {
    evaluation.verdict == Verdict::Yes
}
