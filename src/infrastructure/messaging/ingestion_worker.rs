use std::sync::Arc;

use futures::future::join_all;

use crate::application::ports::status_store::{StatusStore, status_key};
use crate::application::services::ingestion_service::{IngestionError, IngestionService};
use crate::domain::entities::IngestionJob;
use crate::domain::value_objects::IngestionState;
use crate::infrastructure::messaging::MpscJobQueueReceiver;

/// Runs one job to a terminal state: pipeline, temp-file cleanup, status
/// write. The worker pool and the inline (synchronous) dispatch mode
/// share this runner, so both paths have identical semantics.
pub struct JobRunner {
    ingestion_service: Arc<IngestionService>,
    status_store: Arc<dyn StatusStore>,
}

impl JobRunner {
    pub fn new(ingestion_service: Arc<IngestionService>, status_store: Arc<dyn StatusStore>) -> Self {
        Self {
            ingestion_service,
            status_store,
        }
    }

    /// Drives the job to `processed` or `failed`. The temporary source
    /// file is deleted on every exit path before the terminal status is
    /// written; a deletion failure is logged and never changes the
    /// outcome. Re-running a delivered job is safe: insertion is
    /// additive and the status write is last-write-wins.
    pub async fn run(&self, job: &IngestionJob) -> Result<usize, IngestionError> {
        let file_id = job.file_id();
        let started = std::time::Instant::now();

        let result = self.ingestion_service.ingest(job).await;

        self.cleanup_temp_file(job).await;

        match &result {
            Ok(chunk_count) => {
                self.write_terminal_state(file_id, IngestionState::Processed)
                    .await;
                tracing::info!(
                    file_id,
                    source = job.source_label(),
                    chunks = chunk_count,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "ingestion completed"
                );
            }
            Err(error) => {
                self.write_terminal_state(file_id, IngestionState::Failed)
                    .await;
                tracing::error!(
                    file_id,
                    source = job.source_label(),
                    error = %error,
                    "ingestion failed"
                );
            }
        }

        result
    }

    async fn cleanup_temp_file(&self, job: &IngestionJob) {
        let Some(path) = job.temp_path() else {
            return;
        };

        if let Err(error) = tokio::fs::remove_file(path).await {
            if error.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    file_id = job.file_id(),
                    path,
                    error = %error,
                    "failed to delete temporary source file"
                );
            }
        }
    }

    async fn write_terminal_state(&self, file_id: &str, state: IngestionState) {
        if let Err(error) = self
            .status_store
            .set(&status_key(file_id), state.as_str())
            .await
        {
            tracing::error!(file_id, state = %state, error = %error, "status write failed");
        }
    }
}

/// Bounded pool of worker tasks pulling jobs off the queue. Jobs share
/// no mutable state with each other; the status store and vector store
/// are keyed by file id, so no cross-job coordination is needed.
pub struct IngestionWorkerPool {
    job_receiver: Arc<MpscJobQueueReceiver>,
    runner: Arc<JobRunner>,
    worker_count: usize,
}

impl IngestionWorkerPool {
    pub fn new(job_receiver: Arc<MpscJobQueueReceiver>, runner: Arc<JobRunner>) -> Self {
        Self {
            job_receiver,
            runner,
            worker_count: 3,
        }
    }

    pub fn with_worker_count(mut self, count: usize) -> Self {
        self.worker_count = count.max(1);
        self
    }

    /// Runs until the queue's sender half is dropped and the channel is
    /// drained.
    pub async fn start(&self) {
        tracing::info!(workers = self.worker_count, "starting ingestion workers");

        let handles: Vec<_> = (0..self.worker_count)
            .map(|worker_id| {
                let receiver = self.job_receiver.clone();
                let runner = self.runner.clone();

                tokio::spawn(async move {
                    while let Some(job) = receiver.recv().await {
                        tracing::info!(worker_id, file_id = job.file_id(), "job dequeued");
                        let _ = runner.run(&job).await;
                    }
                    tracing::info!(worker_id, "worker stopped, queue closed");
                })
            })
            .collect();

        for (worker_id, result) in join_all(handles).await.into_iter().enumerate() {
            if let Err(error) = result {
                tracing::error!(worker_id, error = %error, "worker panicked");
            }
        }

        tracing::info!("ingestion workers stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::io::Write;
    use std::sync::Mutex;
    use std::time::Duration;

    use crate::application::ports::document_loader::{
        DocumentLoadError, DocumentLoader, IngestionSource, LoadedDocument,
    };
    use crate::application::ports::embedding_provider::{
        EmbeddingProvider, EmbeddingProviderError,
    };
    use crate::application::ports::status_store::StatusStoreError;
    use crate::domain::entities::VectorRecord;
    use crate::domain::repositories::vector_repository::{
        RetrievedChunk, VectorRepository, VectorRepositoryError, VectorScope,
    };
    use crate::infrastructure::external_services::RecursiveCharacterSplitter;
    use crate::infrastructure::messaging::MpscJobQueue;
    use crate::application::ports::JobQueue;

    #[derive(Default)]
    struct InMemoryStatusStore {
        entries: Mutex<HashMap<String, String>>,
    }

    #[async_trait]
    impl StatusStore for InMemoryStatusStore {
        async fn set(&self, key: &str, value: &str) -> Result<(), StatusStoreError> {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn get(&self, key: &str) -> Result<Option<String>, StatusStoreError> {
            Ok(self.entries.lock().unwrap().get(key).cloned())
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

    struct FileReadingLoader;

    #[async_trait]
    impl DocumentLoader for FileReadingLoader {
        async fn load(
            &self,
            source: &IngestionSource,
        ) -> Result<Vec<LoadedDocument>, DocumentLoadError> {
            match source {
                IngestionSource::File { path, file_type } => {
                    if file_type != "pdf" {
                        return Err(DocumentLoadError::UnsupportedSourceKind(file_type.clone()));
                    }
                    let text = std::fs::read_to_string(path)
                        .map_err(|e| DocumentLoadError::IoError(e.to_string()))?;
                    Ok(vec![LoadedDocument {
                        text,
                        metadata: json!({"page": 1}),
                    }])
                }
                IngestionSource::Url { .. } => Ok(vec![LoadedDocument {
                    text: "remote page".to_string(),
                    metadata: json!({}),
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
    struct RecordingRepository {
        records: Mutex<Vec<VectorRecord>>,
    }

    #[async_trait]
    impl VectorRepository for RecordingRepository {
        async fn save_batch(&self, records: &[VectorRecord]) -> Result<(), VectorRepositoryError> {
            self.records.lock().unwrap().extend_from_slice(records);
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

        async fn count_by_file(&self, file_id: &str) -> Result<i64, VectorRepositoryError> {
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.file_id() == file_id)
                .count() as i64)
        }
    }

    fn runner_with(
        status_store: Arc<InMemoryStatusStore>,
        repository: Arc<RecordingRepository>,
    ) -> JobRunner {
        let service = Arc::new(IngestionService::new(
            Arc::new(FileReadingLoader),
            RecursiveCharacterSplitter::default(),
            Arc::new(FixedProvider),
            repository,
        ));
        JobRunner::new(service, status_store)
    }

    fn temp_source(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    fn file_job(path: &str, file_type: &str, file_id: &str) -> IngestionJob {
        IngestionJob::File {
            filename: "report.pdf".to_string(),
            destination: "uploads".to_string(),
            path: path.to_string(),
            file_type: file_type.to_string(),
            file_id: file_id.to_string(),
            email: Some("a@b.com".to_string()),
        }
    }

    #[tokio::test]
    async fn test_successful_job_deletes_temp_file_and_marks_processed() {
        let status_store = Arc::new(InMemoryStatusStore::default());
        let repository = Arc::new(RecordingRepository::default());
        let runner = runner_with(status_store.clone(), repository.clone());

        let source = temp_source("three pages of text");
        let path = source.path().to_string_lossy().to_string();
        let job = file_job(&path, "pdf", "1700-report.pdf");

        runner.run(&job).await.unwrap();

        assert!(!std::path::Path::new(&path).exists());
        assert_eq!(
            status_store
                .get("status:1700-report.pdf")
                .await
                .unwrap()
                .as_deref(),
            Some("processed")
        );
        assert!(repository.count_by_file("1700-report.pdf").await.unwrap() > 0);
    }

    #[tokio::test]
    async fn test_unsupported_extension_deletes_temp_file_and_marks_failed() {
        let status_store = Arc::new(InMemoryStatusStore::default());
        let repository = Arc::new(RecordingRepository::default());
        let runner = runner_with(status_store.clone(), repository.clone());

        let source = temp_source("binary junk");
        let path = source.path().to_string_lossy().to_string();
        let job = file_job(&path, "exe", "1700-virus.exe");

        assert!(runner.run(&job).await.is_err());

        assert!(!std::path::Path::new(&path).exists());
        assert_eq!(
            status_store
                .get("status:1700-virus.exe")
                .await
                .unwrap()
                .as_deref(),
            Some("failed")
        );
        assert!(repository.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_temp_file_does_not_mask_terminal_state() {
        let status_store = Arc::new(InMemoryStatusStore::default());
        let repository = Arc::new(RecordingRepository::default());
        let runner = runner_with(status_store.clone(), repository.clone());

        let job = file_job("/nonexistent/source.pdf", "pdf", "1700-gone.pdf");

        assert!(runner.run(&job).await.is_err());
        assert_eq!(
            status_store
                .get("status:1700-gone.pdf")
                .await
                .unwrap()
                .as_deref(),
            Some("failed")
        );
    }

    #[tokio::test]
    async fn test_redelivery_reruns_pipeline_and_keeps_terminal_state() {
        let status_store = Arc::new(InMemoryStatusStore::default());
        let repository = Arc::new(RecordingRepository::default());
        let runner = runner_with(status_store.clone(), repository.clone());

        let job = IngestionJob::Url {
            url: "https://example.com".to_string(),
            email: None,
            file_id: "1700-example.com".to_string(),
        };

        runner.run(&job).await.unwrap();
        let after_first = repository.count_by_file("1700-example.com").await.unwrap();

        // A redelivered job runs the whole pipeline again: duplicate
        // vectors under the same file id, same terminal state.
        runner.run(&job).await.unwrap();

        assert_eq!(
            repository.count_by_file("1700-example.com").await.unwrap(),
            after_first * 2
        );
        assert_eq!(
            status_store
                .get("status:1700-example.com")
                .await
                .unwrap()
                .as_deref(),
            Some("processed")
        );
    }

    #[tokio::test]
    async fn test_worker_pool_processes_queued_job() {
        let status_store = Arc::new(InMemoryStatusStore::default());
        let repository = Arc::new(RecordingRepository::default());
        let runner = Arc::new(runner_with(status_store.clone(), repository));

        let (queue, receiver) = MpscJobQueue::create_pair();
        let pool = IngestionWorkerPool::new(Arc::new(receiver), runner).with_worker_count(2);
        tokio::spawn(async move { pool.start().await });

        queue
            .enqueue(IngestionJob::Url {
                url: "https://example.com".to_string(),
                email: None,
                file_id: "1700-queued".to_string(),
            })
            .await
            .unwrap();

        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(state) = status_store.get("status:1700-queued").await.unwrap() {
                assert_eq!(state, "processed");
                break;
            }
            assert!(tokio::time::Instant::now() < deadline, "job never finished");
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}
