use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::store::{AnalysisStore, DocumentStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    /// Analysis records. Default: Postgres.
    pub analyses: Arc<dyn AnalysisStore>,
    /// Original uploads. Default: S3 / MinIO.
    pub documents: Arc<dyn DocumentStore>,
    pub config: Config,
}
