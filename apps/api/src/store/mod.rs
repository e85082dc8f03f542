//! Persistence seams. `AppState` carries `Arc<dyn AnalysisStore>` and
//! `Arc<dyn DocumentStore>`; production wires Postgres and S3, tests wire the
//! in-memory backends.

use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::analysis::AnalysisRecord;

#[cfg(test)]
pub mod memory;
pub mod postgres;
pub mod s3;

/// Insert-only store of tailoring results.
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    async fn insert(&self, record: &AnalysisRecord) -> Result<(), AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<AnalysisRecord>, AppError>;

    /// Newest first.
    async fn list_recent(&self, limit: i64) -> Result<Vec<AnalysisRecord>, AppError>;
}

/// Blob store for original uploads.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn put(&self, key: &str, bytes: Bytes) -> Result<(), AppError>;

    async fn get(&self, key: &str) -> Result<Option<Bytes>, AppError>;
}

/// Document-store key of the original upload for an analysis.
pub fn original_document_key(analysis_id: Uuid) -> String {
    format!("originals/{analysis_id}.docx")
}
