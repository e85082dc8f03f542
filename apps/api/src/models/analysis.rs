use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One tailoring request and its result. Insert-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub original_text: String,
    /// Document-store key of the uploaded `.docx`, when one was supplied.
    pub original_document_key: Option<String>,
    pub job_description: String,
    pub tailored_resume: String,
    pub ats_score: i32,
    pub suggestions: Vec<String>,
    pub keyword_matches: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl AnalysisRecord {
    /// File name offered for the tailored download.
    pub fn download_filename(&self) -> String {
        let id = self.id.simple().to_string();
        format!("tailored_resume_{}.docx", &id[..8])
    }
}
