//! Axum route handlers for the tailoring API.

use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderName},
    response::{IntoResponse, Response},
    Json,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::docx::DOCX_MIME;
use crate::errors::AppError;
use crate::models::analysis::AnalysisRecord;
use crate::state::AppState;
use crate::tailoring::extract::extract_resume;
use crate::tailoring::service::{
    decode_original_docx, render_download, tailor_and_record, TailorRequest, TailorResponse,
    RECENT_ANALYSES_LIMIT,
};

/// Which render stage produced a download: `preserved`, `reformatted`, `plain`.
pub const FIDELITY_HEADER: HeaderName = HeaderName::from_static("x-render-fidelity");

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub text: String,
    pub filename: String,
    /// Base64 of the uploaded bytes; sent back with the tailoring request.
    pub docx_content: String,
}

#[derive(Debug, Serialize)]
pub struct AnalysesResponse {
    pub analyses: Vec<AnalysisRecord>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/upload-resume
///
/// Multipart field `file` (a `.docx`). Returns the extracted text and the
/// original bytes as base64.
pub async fn handle_upload_resume(
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;
        upload = Some((filename, bytes));
    }

    let (filename, bytes) =
        upload.ok_or_else(|| AppError::Validation("file is required".to_string()))?;

    if !filename.to_lowercase().ends_with(".docx") {
        return Err(AppError::Validation(
            "Only DOCX files are supported".to_string(),
        ));
    }

    let extracted = tokio::task::spawn_blocking(move || extract_resume(bytes))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Extraction task failed: {e}")))??;

    if extracted.text.trim().is_empty() {
        return Err(AppError::Validation(
            "Could not extract text from resume".to_string(),
        ));
    }

    info!(
        "Extracted {} lines from {filename}",
        extracted.text.lines().count()
    );

    Ok(Json(UploadResponse {
        success: true,
        text: extracted.text,
        filename,
        docx_content: BASE64.encode(&extracted.original),
    }))
}

/// POST /api/tailor-resume
///
/// Multipart fields `resume_text`, `job_description` and optional
/// `original_docx_content` (base64 from the upload response).
pub async fn handle_tailor_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<TailorResponse>, AppError> {
    let mut resume_text = String::new();
    let mut job_description = String::new();
    let mut original_docx_content: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        let value = field.text().await.map_err(multipart_error)?;
        match name.as_str() {
            "resume_text" => resume_text = value,
            "job_description" => job_description = value,
            "original_docx_content" => original_docx_content = Some(value),
            _ => {}
        }
    }

    if resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "resume_text cannot be empty".to_string(),
        ));
    }
    if job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let request = TailorRequest {
        resume_text,
        job_description,
        original_docx: decode_original_docx(original_docx_content.as_deref()),
    };

    let response = tailor_and_record(
        &state.llm,
        state.analyses.as_ref(),
        state.documents.as_ref(),
        request,
    )
    .await?;

    Ok(Json(response))
}

/// GET /api/download-resume/:id
///
/// Streams the tailored résumé as a `.docx` attachment; `X-Render-Fidelity`
/// tells the client which render stage produced it.
pub async fn handle_download_resume(
    State(state): State<AppState>,
    Path(analysis_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let (record, rendered) = render_download(
        state.analyses.as_ref(),
        state.documents.as_ref(),
        analysis_id,
    )
    .await?;

    let disposition = format!("attachment; filename=\"{}\"", record.download_filename());
    Ok((
        [
            (header::CONTENT_TYPE, DOCX_MIME.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
            (FIDELITY_HEADER, rendered.fidelity.as_str().to_string()),
        ],
        rendered.bytes,
    )
        .into_response())
}

/// GET /api/analyses
///
/// Most recent analyses, newest first.
pub async fn handle_list_analyses(
    State(state): State<AppState>,
) -> Result<Json<AnalysesResponse>, AppError> {
    let analyses = state.analyses.list_recent(RECENT_ANALYSES_LIMIT).await?;
    Ok(Json(AnalysesResponse { analyses }))
}

/// GET /api/analyses/:id
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    Path(analysis_id): Path<Uuid>,
) -> Result<Json<AnalysisRecord>, AppError> {
    state
        .analyses
        .get(analysis_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Analysis {analysis_id} not found")))
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("Invalid multipart body: {e}"))
}
