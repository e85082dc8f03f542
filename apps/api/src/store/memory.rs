//! In-memory backends for router and service tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use super::{AnalysisStore, DocumentStore};
use crate::errors::AppError;
use crate::models::analysis::AnalysisRecord;

#[derive(Default)]
pub struct MemoryAnalysisStore {
    records: Mutex<Vec<AnalysisRecord>>,
}

#[async_trait]
impl AnalysisStore for MemoryAnalysisStore {
    async fn insert(&self, record: &AnalysisRecord) -> Result<(), AppError> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<AnalysisRecord>, AppError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<AnalysisRecord>, AppError> {
        let mut records = self.records.lock().unwrap().clone();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit.max(0) as usize);
        Ok(records)
    }
}

#[derive(Default)]
pub struct MemoryDocumentStore {
    objects: Mutex<HashMap<String, Bytes>>,
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn put(&self, key: &str, bytes: Bytes) -> Result<(), AppError> {
        self.objects.lock().unwrap().insert(key.to_string(), bytes);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>, AppError> {
        Ok(self.objects.lock().unwrap().get(key).cloned())
    }
}
