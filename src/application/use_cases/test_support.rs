//! Shared fakes for use-case tests: an event-logging status store and
//! queue, plus a job runner wired to in-memory pipeline stages.

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::application::ports::document_loader::{
    DocumentLoadError, DocumentLoader, IngestionSource, LoadedDocument,
};
use crate::application::ports::embedding_provider::{EmbeddingProvider, EmbeddingProviderError};
use crate::application::ports::job_queue::{JobQueue, JobQueueError};
use crate::application::ports::status_store::{StatusStore, StatusStoreError};
use crate::application::services::ingestion_service::IngestionService;
use crate::domain::entities::{IngestionJob, VectorRecord};
use crate::domain::repositories::vector_repository::{
    RetrievedChunk, VectorRepository, VectorRepositoryError, VectorScope,
};
use crate::infrastructure::external_services::RecursiveCharacterSplitter;
use crate::infrastructure::messaging::JobRunner;

#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<String>>>,
}

impl EventLog {
    pub fn record(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

pub struct InMemoryStatusStore {
    entries: Mutex<HashMap<String, String>>,
    log: EventLog,
}

impl InMemoryStatusStore {
    pub fn new(log: EventLog) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            log,
        }
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl StatusStore for InMemoryStatusStore {
    async fn set(&self, key: &str, value: &str) -> Result<(), StatusStoreError> {
        self.log.record(format!("set:{}={}", key, value));
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StatusStoreError> {
        Ok(self.value(key))
    }

    async fn increment_with_expiry(
        &self,
        key: &str,
        _window_seconds: i64,
    ) -> Result<i64, StatusStoreError> {
        let mut entries = self.entries.lock().unwrap();
        let count = entries
            .get(key)
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(0)
            + 1;
        entries.insert(key.to_string(), count.to_string());
        Ok(count)
    }
}

pub struct RecordingQueue {
    jobs: Mutex<Vec<IngestionJob>>,
    log: EventLog,
}

impl RecordingQueue {
    pub fn new(log: EventLog) -> Self {
        Self {
            jobs: Mutex::new(Vec::new()),
            log,
        }
    }

    pub fn jobs(&self) -> Vec<IngestionJob> {
        self.jobs.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobQueue for RecordingQueue {
    async fn enqueue(&self, job: IngestionJob) -> Result<(), JobQueueError> {
        self.log.record(format!("enqueue:{}", job.file_id()));
        self.jobs.lock().unwrap().push(job);
        Ok(())
    }

    async fn dequeue(&self) -> Result<IngestionJob, JobQueueError> {
        Err(JobQueueError::ConnectionError(
            "not a consumable queue".to_string(),
        ))
    }

    async fn try_dequeue(&self) -> Result<Option<IngestionJob>, JobQueueError> {
        Ok(None)
    }

    async fn remove(&self, file_id: &str) -> Result<bool, JobQueueError> {
        let mut jobs = self.jobs.lock().unwrap();
        let before = jobs.len();
        jobs.retain(|job| job.file_id() != file_id);
        Ok(jobs.len() != before)
    }

    async fn len(&self) -> Result<usize, JobQueueError> {
        Ok(self.jobs.lock().unwrap().len())
    }
}

struct FileReadingLoader;

#[async_trait]
impl DocumentLoader for FileReadingLoader {
    async fn load(
        &self,
        source: &IngestionSource,
    ) -> Result<Vec<LoadedDocument>, DocumentLoadError> {
        match source {
            IngestionSource::File { path, file_type } => {
                if file_type != "pdf" && file_type != "docx" {
                    return Err(DocumentLoadError::UnsupportedSourceKind(file_type.clone()));
                }
                let text = std::fs::read_to_string(path)
                    .map_err(|e| DocumentLoadError::IoError(e.to_string()))?;
                Ok(vec![LoadedDocument {
                    text,
                    metadata: json!({"page": 1}),
                }])
            }
            IngestionSource::Url { url } => Ok(vec![LoadedDocument {
                text: format!("content of {}", url),
                metadata: json!({"source": url}),
            }]),
        }
    }
}

struct FixedProvider;

#[async_trait]
impl EmbeddingProvider for FixedProvider {
    async fn embed(&self, _text: &str) -> Result<pgvector::Vector, EmbeddingProviderError> {
        Ok(pgvector::Vector::from(vec![0.0, 1.0]))
    }

    async fn embed_batch(
        &self,
        texts: &[String],
    ) -> Result<Vec<pgvector::Vector>, EmbeddingProviderError> {
        Ok(texts
            .iter()
            .map(|_| pgvector::Vector::from(vec![0.0, 1.0]))
            .collect())
    }

    fn embedding_dimension(&self) -> usize {
        2
    }
}

#[derive(Default)]
struct DiscardingRepository;

#[async_trait]
impl VectorRepository for DiscardingRepository {
    async fn save_batch(&self, _records: &[VectorRecord]) -> Result<(), VectorRepositoryError> {
        Ok(())
    }

    async fn similarity_search(
        &self,
        _query: &pgvector::Vector,
        _k: i64,
        _scope: &VectorScope,
    ) -> Result<Vec<RetrievedChunk>, VectorRepositoryError> {
        Ok(Vec::new())
    }

    async fn delete_older_than(
        &self,
        _cutoff: chrono::DateTime<chrono::Utc>,
    ) -> Result<u64, VectorRepositoryError> {
        Ok(0)
    }

    async fn count_by_file(&self, _file_id: &str) -> Result<i64, VectorRepositoryError> {
        Ok(0)
    }
}

pub fn test_runner(status_store: Arc<InMemoryStatusStore>) -> JobRunner {
    let service = Arc::new(IngestionService::new(
        Arc::new(FileReadingLoader),
        RecursiveCharacterSplitter::default(),
        Arc::new(FixedProvider),
        Arc::new(DiscardingRepository),
    ));
    JobRunner::new(service, status_store)
}
