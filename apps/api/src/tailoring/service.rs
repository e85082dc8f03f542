//! Résumé tailoring — orchestrates the pipeline.
//!
//! Tailor flow: LLM rewrite → ATS score on the rewrite → store the original
//! upload → insert the analysis record.
//! Download flow: load record + original → render chain (blocking pool).

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::prompts::TRUTHFULNESS_INSTRUCTION;
use crate::llm_client::LlmClient;
use crate::models::analysis::AnalysisRecord;
use crate::store::{original_document_key, AnalysisStore, DocumentStore};
use crate::tailoring::ats::analyze_ats;
use crate::tailoring::prompts::{TAILOR_PROMPT_TEMPLATE, TAILOR_SYSTEM};
use crate::tailoring::render::{render_resume, RenderedResume};

/// Maximum number of records returned by the analyses listing.
pub const RECENT_ANALYSES_LIMIT: i64 = 50;

#[derive(Debug, Clone)]
pub struct TailorRequest {
    pub resume_text: String,
    pub job_description: String,
    /// The originally uploaded `.docx`, when the client sent it back.
    pub original_docx: Option<Bytes>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TailorResponse {
    pub success: bool,
    pub analysis_id: Uuid,
    pub tailored_resume: String,
    pub ats_score: i32,
    pub suggestions: Vec<String>,
    pub keyword_matches: Vec<String>,
    pub missing_keywords: Vec<String>,
}

/// Decodes the base64 `original_docx_content` form field. Anything that does
/// not decode is treated as absent; the download then reformats from text.
pub fn decode_original_docx(encoded: Option<&str>) -> Option<Bytes> {
    let encoded = encoded.map(str::trim).filter(|s| !s.is_empty())?;
    match BASE64.decode(encoded) {
        Ok(bytes) if !bytes.is_empty() => Some(Bytes::from(bytes)),
        Ok(_) => None,
        Err(e) => {
            warn!("Ignoring undecodable original_docx_content: {e}");
            None
        }
    }
}

/// Rewrites the résumé text for the job description.
pub async fn tailor_resume_text(
    llm: &LlmClient,
    resume_text: &str,
    job_description: &str,
) -> Result<String, AppError> {
    let prompt = TAILOR_PROMPT_TEMPLATE
        .replace("{job_description}", job_description)
        .replace("{resume_text}", resume_text)
        .replace("{truthfulness}", TRUTHFULNESS_INSTRUCTION);

    llm.call_text(&prompt, TAILOR_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Error tailoring resume: {e}")))
}

/// Runs the tailoring pipeline and persists its result.
pub async fn tailor_and_record(
    llm: &LlmClient,
    analyses: &dyn AnalysisStore,
    documents: &dyn DocumentStore,
    request: TailorRequest,
) -> Result<TailorResponse, AppError> {
    let tailored = tailor_resume_text(llm, &request.resume_text, &request.job_description).await?;
    info!("Tailored résumé: {} lines", tailored.lines().count());

    let ats = analyze_ats(llm, &tailored, &request.job_description).await?;
    info!("ATS score: {}/100", ats.score);

    let record = AnalysisRecord {
        id: Uuid::new_v4(),
        original_text: request.resume_text,
        original_document_key: None,
        job_description: request.job_description,
        tailored_resume: tailored,
        ats_score: ats.score,
        suggestions: ats.suggestions,
        keyword_matches: ats.keyword_matches,
        missing_keywords: ats.missing_keywords,
        created_at: Utc::now(),
    };

    let record = store_analysis(analyses, documents, record, request.original_docx).await?;

    Ok(TailorResponse {
        success: true,
        analysis_id: record.id,
        tailored_resume: record.tailored_resume,
        ats_score: record.ats_score,
        suggestions: record.suggestions,
        keyword_matches: record.keyword_matches,
        missing_keywords: record.missing_keywords,
    })
}

/// Stores the original upload (if any) and inserts the record pointing at it.
pub async fn store_analysis(
    analyses: &dyn AnalysisStore,
    documents: &dyn DocumentStore,
    mut record: AnalysisRecord,
    original_docx: Option<Bytes>,
) -> Result<AnalysisRecord, AppError> {
    if let Some(bytes) = original_docx {
        let key = original_document_key(record.id);
        documents.put(&key, bytes).await?;
        record.original_document_key = Some(key);
    }

    analyses.insert(&record).await?;
    info!("Stored analysis {}", record.id);
    Ok(record)
}

/// Loads an analysis and renders its downloadable `.docx`.
pub async fn render_download(
    analyses: &dyn AnalysisStore,
    documents: &dyn DocumentStore,
    analysis_id: Uuid,
) -> Result<(AnalysisRecord, RenderedResume), AppError> {
    let record = analyses
        .get(analysis_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Analysis not found".to_string()))?;

    let original = match &record.original_document_key {
        Some(key) => {
            let bytes = documents.get(key).await?;
            if bytes.is_none() {
                warn!("Original document {key} is missing, reformatting from text");
            }
            bytes
        }
        None => None,
    };

    let original_text = record.original_text.clone();
    let tailored = record.tailored_resume.clone();
    let rendered = tokio::task::spawn_blocking(move || {
        render_resume(original.as_deref(), &original_text, &tailored)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Render task failed: {e}")))?
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to render document: {e}")))?;

    info!(
        "Rendered analysis {} ({:?}, {} bytes)",
        record.id,
        rendered.fidelity,
        rendered.bytes.len()
    );

    Ok((record, rendered))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::{render_document, Document, Paragraph};
    use crate::store::memory::{MemoryAnalysisStore, MemoryDocumentStore};
    use crate::tailoring::render::Fidelity;

    fn record(tailored: &str) -> AnalysisRecord {
        AnalysisRecord {
            id: Uuid::new_v4(),
            original_text: "Jane Doe\nPython Developer".to_string(),
            original_document_key: None,
            job_description: "Senior Python role".to_string(),
            tailored_resume: tailored.to_string(),
            ats_score: 81,
            suggestions: vec!["Mention AWS".to_string()],
            keyword_matches: vec!["Python".to_string()],
            missing_keywords: vec!["AWS".to_string()],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_decode_original_docx() {
        assert_eq!(
            decode_original_docx(Some("UEsDBA==")),
            Some(Bytes::from_static(b"PK\x03\x04"))
        );
        assert_eq!(decode_original_docx(Some("  ")), None);
        assert_eq!(decode_original_docx(None), None);
        assert_eq!(
            decode_original_docx(Some("invalid_base64_content_that_should_trigger_fallback")),
            None
        );
    }

    #[tokio::test]
    async fn test_store_analysis_keeps_original_under_record_key() {
        let analyses = MemoryAnalysisStore::default();
        let documents = MemoryDocumentStore::default();

        let stored = store_analysis(
            &analyses,
            &documents,
            record("Jane Doe"),
            Some(Bytes::from_static(b"docx")),
        )
        .await
        .unwrap();

        let key = stored.original_document_key.clone().unwrap();
        assert_eq!(key, original_document_key(stored.id));
        assert_eq!(
            documents.get(&key).await.unwrap(),
            Some(Bytes::from_static(b"docx"))
        );
        assert_eq!(analyses.get(stored.id).await.unwrap(), Some(stored));
    }

    #[tokio::test]
    async fn test_render_download_preserves_original_formatting() {
        let analyses = MemoryAnalysisStore::default();
        let documents = MemoryDocumentStore::default();
        let original = render_document(&Document {
            paragraphs: vec![
                Paragraph::plain("Jane Doe"),
                Paragraph::plain("Python Developer"),
            ],
        })
        .unwrap();
        let stored = store_analysis(
            &analyses,
            &documents,
            record("Jane Doe\nSenior Python Developer with cloud skills"),
            Some(Bytes::from(original)),
        )
        .await
        .unwrap();

        let (_, rendered) = render_download(&analyses, &documents, stored.id)
            .await
            .unwrap();

        assert_eq!(rendered.fidelity, Fidelity::Preserved);
        let doc = Document::from_bytes(&rendered.bytes).unwrap();
        assert_eq!(
            doc.non_empty_lines(),
            vec!["Jane Doe", "Senior Python Developer with cloud skills"]
        );
    }

    #[tokio::test]
    async fn test_render_download_without_original_reformats() {
        let analyses = MemoryAnalysisStore::default();
        let documents = MemoryDocumentStore::default();
        let stored = store_analysis(&analyses, &documents, record("EXPERIENCE\nBuilt APIs, daily."), None)
            .await
            .unwrap();

        let (_, rendered) = render_download(&analyses, &documents, stored.id)
            .await
            .unwrap();
        assert_eq!(rendered.fidelity, Fidelity::Reformatted);
    }

    #[tokio::test]
    async fn test_render_download_unknown_id_is_not_found() {
        let err = render_download(
            &MemoryAnalysisStore::default(),
            &MemoryDocumentStore::default(),
            Uuid::new_v4(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
