//! Axum route handlers for bulk screening.

use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::screening::batch::{BatchReport, ScreeningPipeline, ScreeningRequest};
use crate::screening::export::{rows_to_csv, EXPORT_FILE_NAME};
use crate::screening::models::ReportRow;
use crate::state::AppState;
use crate::upload::UploadForm;

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub rows: Vec<ReportRow>,
}

/// POST /api/v1/screening
///
/// Multipart: `job_description`, `query`, one or more resume files.
/// Every resume is screened in upload order; recoverable failures land in `warnings`.
pub async fn handle_screening(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<BatchReport>, AppError> {
    let form = UploadForm::from_multipart(multipart).await?;

    let (Some(job_description), Some(query), false) = (
        form.text("job_description").map(String::from),
        form.text("query").map(String::from),
        form.files.is_empty(),
    ) else {
        return Err(AppError::Validation(
            "Please provide a job description, upload at least one resume, and enter a query."
                .to_string(),
        ));
    };

    let request = ScreeningRequest {
        job_description,
        query,
        resumes: form.files,
    };

    let pipeline = ScreeningPipeline::new(state.extractor.clone(), state.model.clone());
    Ok(Json(pipeline.run(request).await))
}

/// POST /api/v1/screening/export
///
/// Turns report rows into a downloadable CSV. No rows → 204.
pub async fn handle_export(Json(request): Json<ExportRequest>) -> Result<Response, AppError> {
    if request.rows.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let csv = rows_to_csv(&request.rows)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        csv,
    )
        .into_response())
}
