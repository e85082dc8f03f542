use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::AnalysisStore;
use crate::errors::AppError;
use crate::models::analysis::AnalysisRecord;

pub struct PgAnalysisStore {
    pool: PgPool,
}

impl PgAnalysisStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalysisStore for PgAnalysisStore {
    async fn insert(&self, record: &AnalysisRecord) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO resume_analyses
                (id, original_text, original_document_key, job_description, tailored_resume,
                 ats_score, suggestions, keyword_matches, missing_keywords, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(record.id)
        .bind(&record.original_text)
        .bind(&record.original_document_key)
        .bind(&record.job_description)
        .bind(&record.tailored_resume)
        .bind(record.ats_score)
        .bind(&record.suggestions)
        .bind(&record.keyword_matches)
        .bind(&record.missing_keywords)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<AnalysisRecord>, AppError> {
        Ok(
            sqlx::query_as::<_, AnalysisRecord>("SELECT * FROM resume_analyses WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<AnalysisRecord>, AppError> {
        Ok(sqlx::query_as::<_, AnalysisRecord>(
            "SELECT * FROM resume_analyses ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }
}
