//! Axum route handlers for the form UI and the JSON ranking API.

use askama::Template;
use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::resume::{Intake, JobDescription, ResumeUpload};
use crate::ranking::extract::screen_upload;
use crate::ranking::pipeline::{rank_resumes_blocking, SkippedResume};
use crate::ranking::views::{IndexPage, ResultsPage};
use crate::ranking::RankingOutcome;
use crate::state::AppState;
use crate::storage::stored_name_for;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub job_title: String,
    pub job_description: String,
    #[serde(default)]
    pub resumes: Vec<ResumePayload>,
}

#[derive(Debug, Deserialize)]
pub struct ResumePayload {
    pub filename: String,
    /// Base64 (standard alphabet) encoded file bytes.
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ScoredResume {
    pub resume: String,
    /// Percentage, rounded to 2 decimals.
    pub score: f64,
}

#[derive(Debug, Serialize)]
pub struct RankResponse {
    pub job_title: String,
    pub ranked_resumes: Vec<ScoredResume>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedResume>,
}

/// Fields collected from the multipart form.
struct RankForm {
    job_title: Option<String>,
    job_description: Option<String>,
    files: Vec<(String, Bytes)>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /
pub async fn handle_index() -> Result<Html<String>, AppError> {
    Ok(Html(IndexPage {}.render()?))
}

/// POST /
///
/// Ranks uploaded `.pdf` files and renders the results page. Other files are
/// ignored. With nothing to rank, redirects back to the form.
pub async fn handle_form_submit(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let form = read_rank_form(&mut multipart).await?;
    let job_title = form
        .job_title
        .ok_or_else(|| AppError::Validation("job_title is required".to_string()))?;
    let job_description = form
        .job_description
        .ok_or_else(|| AppError::Validation("job_description is required".to_string()))?;

    let mut uploads = Vec::with_capacity(form.files.len());
    for (filename, content) in form.files {
        let stored_name = stored_name_for(&filename);
        let mut upload = ResumeUpload {
            identifier: stored_name.clone(),
            filename,
            content,
        };
        if screen_upload(&upload, Intake::Form).is_some() {
            upload.identifier = upload.filename.clone();
        } else {
            state.archive.persist(&stored_name, &upload.content).await?;
        }
        uploads.push(upload);
    }

    info!("Form submission for '{job_title}' with {} files", uploads.len());

    let description = JobDescription {
        title: job_title.clone(),
        text: job_description,
    };
    let outcome = rank_resumes_blocking(
        description,
        uploads,
        Intake::Form,
        state.stopwords.clone(),
        state.config.failure_policy,
    )
    .await?;

    match outcome {
        RankingOutcome::NoResults { .. } => Ok(redirect_to_index()),
        RankingOutcome::Ranked { ranked, skipped } => {
            let page = ResultsPage {
                job_title: &job_title,
                ranked_resumes: &ranked,
                skipped: &skipped,
            };
            Ok(Html(page.render()?).into_response())
        }
    }
}

/// POST /api/rank_resumes
///
/// Ranks base64-encoded resumes. Scores are percentages. No filename filtering.
pub async fn handle_rank_api(
    State(state): State<AppState>,
    Json(request): Json<RankRequest>,
) -> Result<Json<RankResponse>, AppError> {
    let mut uploads = Vec::with_capacity(request.resumes.len());
    for payload in request.resumes {
        let content = STANDARD.decode(payload.content.trim()).map_err(|e| {
            AppError::Validation(format!(
                "content of '{}' is not valid base64: {e}",
                payload.filename
            ))
        })?;
        let stored_name = stored_name_for(&payload.filename);
        state.archive.persist(&stored_name, &content).await?;
        uploads.push(ResumeUpload {
            identifier: payload.filename.clone(),
            filename: payload.filename,
            content: Bytes::from(content),
        });
    }

    info!(
        "API ranking request for '{}' with {} resumes",
        request.job_title,
        uploads.len()
    );

    let description = JobDescription {
        title: request.job_title.clone(),
        text: request.job_description,
    };
    let outcome = rank_resumes_blocking(
        description,
        uploads,
        Intake::Api,
        state.stopwords.clone(),
        state.config.failure_policy,
    )
    .await?;

    match outcome {
        RankingOutcome::NoResults { skipped } => Err(AppError::NothingRanked { skipped }),
        RankingOutcome::Ranked { ranked, skipped } => Ok(Json(RankResponse {
            job_title: request.job_title,
            ranked_resumes: ranked
                .iter()
                .map(|r| ScoredResume {
                    resume: r.resume.clone(),
                    score: r.percentage(),
                })
                .collect(),
            skipped,
        })),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// 302 back to the form.
fn redirect_to_index() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response()
}

async fn read_rank_form(multipart: &mut Multipart) -> Result<RankForm, AppError> {
    let mut form = RankForm {
        job_title: None,
        job_description: None,
        files: Vec::new(),
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "job_title" => form.job_title = Some(read_text(field).await?),
            "job_description" => form.job_description = Some(read_text(field).await?),
            "resumes" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;
                form.files.push((filename, data));
            }
            _ => {
                // drain unknown parts
                field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read field: {e}")))?;
            }
        }
    }

    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Could not read form field: {e}")))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
