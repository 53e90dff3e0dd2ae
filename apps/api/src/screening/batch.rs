//! Batch Orchestrator: screens every uploaded resume in upload order.
//!
//! Flow per resume: extract → build prompt → model call → normalize → override.
//! Strictly sequential: each resume finishes before the next one starts, so the
//! report order is the upload order. A failure in any step skips that resume only.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::extraction::{extract_blocking, TextExtractor};
use crate::llm_client::GenerativeModel;
use crate::screening::criteria::extract_criteria;
use crate::screening::filter::{apply_criteria, passes};
use crate::screening::models::{EvaluationResult, ReportRow, ScreeningCriteria, Verdict};
use crate::screening::normalizer::normalize_reply;
use crate::screening::prompts::build_screening_prompt;
use crate::upload::UploadedFile;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ScreeningRequest {
    pub job_description: String,
    pub query: String,
    pub resumes: Vec<UploadedFile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Matched,
    NotMatched,
    Skipped,
}

/// What happened to one uploaded file.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeOutcome {
    pub file_name: String,
    pub status: OutcomeStatus,
    pub evaluation: Option<EvaluationResult>,
    /// The verdict was flipped to `Yes` by the criteria override.
    pub overridden: bool,
    pub raw_response: Option<String>,
    pub detail: Option<String>,
}

impl ResumeOutcome {
    fn skipped(file_name: &str, detail: String) -> Self {
        Self {
            file_name: file_name.to_string(),
            status: OutcomeStatus::Skipped,
            evaluation: None,
            overridden: false,
            raw_response: None,
            detail: Some(detail),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub criteria: ScreeningCriteria,
    /// Resumes whose final verdict is `Yes`, in upload order.
    pub rows: Vec<ReportRow>,
    /// Every uploaded file, in upload order.
    pub outcomes: Vec<ResumeOutcome>,
    pub warnings: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

pub struct ScreeningPipeline {
    extractor: Arc<dyn TextExtractor>,
    model: Arc<dyn GenerativeModel>,
}

impl ScreeningPipeline {
    pub fn new(extractor: Arc<dyn TextExtractor>, model: Arc<dyn GenerativeModel>) -> Self {
        Self { extractor, model }
    }

    pub async fn run(&self, request: ScreeningRequest) -> BatchReport {
        let run_id = Uuid::new_v4();
        let criteria = extract_criteria(&request.query);
        info!(
            "Screening run {run_id}: {} resume(s), threshold={:?}, institution={:?}",
            request.resumes.len(),
            criteria.score_threshold,
            criteria.required_institution
        );

        let mut rows = Vec::new();
        let mut outcomes = Vec::with_capacity(request.resumes.len());
        let mut warnings = Vec::new();

        for resume in &request.resumes {
            let outcome = self
                .screen_one(resume, &request, &criteria, &mut warnings)
                .await;

            if outcome.status == OutcomeStatus::Matched {
                if let Some(evaluation) = &outcome.evaluation {
                    rows.push(ReportRow::new(&resume.file_name, evaluation));
                }
            }
            outcomes.push(outcome);
        }

        info!(
            "Screening run {run_id} finished: {} of {} matched, {} warning(s)",
            rows.len(),
            outcomes.len(),
            warnings.len()
        );

        BatchReport {
            run_id,
            generated_at: Utc::now(),
            criteria,
            rows,
            outcomes,
            warnings,
        }
    }

    async fn screen_one(
        &self,
        resume: &UploadedFile,
        request: &ScreeningRequest,
        criteria: &ScreeningCriteria,
        warnings: &mut Vec<String>,
    ) -> ResumeOutcome {
        let file_name = resume.file_name.as_str();

        let extracted = match extract_blocking(self.extractor.clone(), resume.bytes.clone()).await
        {
            Ok(extracted) => extracted,
            Err(e) => {
                let message = format!("Error reading {file_name}: {e}");
                warn!("{message}");
                warnings.push(message.clone());
                return ResumeOutcome::skipped(file_name, message);
            }
        };

        if extracted.is_empty() {
            let message = format!("No text could be extracted from {file_name}; skipped");
            warn!("{message}");
            warnings.push(message.clone());
            return ResumeOutcome::skipped(file_name, message);
        }
        if !extracted.pages_skipped.is_empty() {
            warnings.push(format!(
                "{file_name}: skipped unreadable pages {:?}",
                extracted.pages_skipped
            ));
        }

        let prompt = build_screening_prompt(&request.query, &request.job_description, &extracted.text);

        let raw = match self.model.generate(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                let message = format!("Error processing {file_name}: {e}");
                warn!("{message}");
                warnings.push(message.clone());
                return ResumeOutcome::skipped(file_name, message);
            }
        };
        debug!("Raw response for {file_name}: {raw}");

        let normalized = normalize_reply(&raw);
        let mut evaluation = normalized.evaluation;
        if evaluation.verdict == Verdict::ParsingError {
            debug!("Unparseable reply for {file_name}: {}", normalized.cleaned);
            warnings.push(format!("Failed to parse model reply for {file_name}"));
        }

        let overridden = apply_criteria(&mut evaluation, criteria);
        if overridden {
            info!("{file_name}: model said no, criteria override applied");
        }

        let status = if passes(&evaluation) {
            info!("Processed {file_name} (criteria met)");
            OutcomeStatus::Matched
        } else {
            info!("Processed {file_name}: did not meet the criteria");
            OutcomeStatus::NotMatched
        };

        ResumeOutcome {
            file_name: file_name.to_string(),
            status,
            evaluation: Some(evaluation),
            overridden,
            raw_response: Some(raw),
            detail: None,
        }
    }
}
