//! Axum route handlers for the single-candidate analysis flows.

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::analysis::portfolio::ProjectDetails;
use crate::analysis::prompts::{AnalysisMode, InterviewType};
use crate::analysis::service::{
    analyze_resume, analyze_skill_gap, build_portfolio, plan_career_path, prepare_interview,
    AnalysisResponse, PortfolioResponse,
};
use crate::errors::AppError;
use crate::extraction::{extract_combined, CombinedText};
use crate::state::AppState;
use crate::upload::UploadForm;

const MAX_YEARS_EXPERIENCE: u8 = 50;

/// Resume text for optional uploads: empty with no warnings when nothing was sent.
async fn optional_resume_text(state: &AppState, form: &UploadForm) -> CombinedText {
    if form.files.is_empty() {
        return CombinedText {
            text: String::new(),
            warnings: Vec::new(),
        };
    }
    extract_combined(state.extractor.clone(), &form.files).await
}

/// POST /api/v1/analysis
///
/// Multipart: `job_description`, `mode`, `query` (for mode=query), resume file(s).
pub async fn handle_analysis(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    let form = UploadForm::from_multipart(multipart).await?;
    let job_description = form.require_text("job_description")?;
    let files = form.require_files()?;
    let mode = AnalysisMode::parse(form.require_text("mode")?, form.text("query"))
        .map_err(AppError::Validation)?;

    let resume = extract_combined(state.extractor.clone(), files).await;
    let response = analyze_resume(state.model.as_ref(), job_description, &resume.text, &mode).await?;

    Ok(Json(AnalysisResponse {
        action: mode.label().to_string(),
        response,
        warnings: resume.warnings,
    }))
}

/// POST /api/v1/skill-gap
///
/// Multipart: `job_description`, `current_skills`, optional resume file.
pub async fn handle_skill_gap(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    let form = UploadForm::from_multipart(multipart).await?;
    let job_description = form.require_text("job_description")?;
    let current_skills = form.require_text("current_skills")?;

    let resume = optional_resume_text(&state, &form).await;
    let response =
        analyze_skill_gap(state.model.as_ref(), job_description, current_skills, &resume.text).await?;

    Ok(Json(AnalysisResponse {
        action: "skill_gap".to_string(),
        response,
        warnings: resume.warnings,
    }))
}

/// POST /api/v1/interview-prep
///
/// Multipart: `job_description`, `interview_type` (defaults to all types), resume file.
pub async fn handle_interview_prep(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    let form = UploadForm::from_multipart(multipart).await?;
    let job_description = form.require_text("job_description")?;
    let files = form.require_files()?;
    let interview_type = match form.text("interview_type") {
        Some(raw) => raw.parse::<InterviewType>().map_err(AppError::Validation)?,
        None => InterviewType::default(),
    };

    let resume = extract_combined(state.extractor.clone(), files).await;
    let response =
        prepare_interview(state.model.as_ref(), job_description, &resume.text, interview_type)
            .await?;

    Ok(Json(AnalysisResponse {
        action: "interview_prep".to_string(),
        response,
        warnings: resume.warnings,
    }))
}

/// POST /api/v1/career-path
///
/// Multipart: `job_description`, `years_experience` (0–50), resume file.
pub async fn handle_career_path(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    let form = UploadForm::from_multipart(multipart).await?;
    let job_description = form.require_text("job_description")?;
    let files = form.require_files()?;
    let years_experience = parse_years(form.text("years_experience"))?;

    let resume = extract_combined(state.extractor.clone(), files).await;
    let response =
        plan_career_path(state.model.as_ref(), job_description, &resume.text, years_experience)
            .await?;

    Ok(Json(AnalysisResponse {
        action: "career_path".to_string(),
        response,
        warnings: resume.warnings,
    }))
}

/// POST /api/v1/portfolio
///
/// Multipart: `project_name`, `project_description` (required), `job_description`,
/// `technologies`, `duration`, `role`, `team_size`, `link`, optional resume file.
pub async fn handle_portfolio(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<PortfolioResponse>, AppError> {
    let form = UploadForm::from_multipart(multipart).await?;
    let project_name = form.require_text("project_name")?;
    let project_description = form.require_text("project_description")?;
    let job_description = form.text("job_description").unwrap_or_default();

    let details = ProjectDetails {
        name: project_name.to_string(),
        technologies: form.text("technologies").unwrap_or_default().to_string(),
        duration: form.text("duration").map(String::from),
        role: form.text("role").map(String::from),
        team_size: form.text("team_size").map(String::from),
        link: form.text("link").map(String::from),
    };

    let resume = optional_resume_text(&state, &form).await;
    let (enhanced_description, best_features, page) = build_portfolio(
        state.model.as_ref(),
        job_description,
        project_description,
        &resume.text,
        &details,
    )
    .await?;

    Ok(Json(PortfolioResponse {
        enhanced_description,
        best_features,
        file_name: page.file_name,
        html: page.html,
        warnings: resume.warnings,
    }))
}

fn parse_years(raw: Option<&str>) -> Result<u8, AppError> {
    let Some(raw) = raw else {
        return Ok(0);
    };
    raw.parse::<u8>()
        .ok()
        .filter(|years| *years <= MAX_YEARS_EXPERIENCE)
        .ok_or_else(|| {
            AppError::Validation(format!(
                "'years_experience' must be a whole number between 0 and {MAX_YEARS_EXPERIENCE}"
            ))
        })
}
