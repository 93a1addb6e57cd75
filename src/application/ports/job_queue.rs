use async_trait::async_trait;

use crate::domain::entities::IngestionJob;

#[derive(Debug)]
pub enum JobQueueError {
    ConnectionError(String),
    SerializationError(String),
}

impl std::fmt::Display for JobQueueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobQueueError::ConnectionError(msg) => write!(f, "Connection error: {}", msg),
            JobQueueError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for JobQueueError {}

/// The durable work queue between the ingestion request and the worker
/// pool. Delivery is at-least-once: a consumer must tolerate seeing the
/// same job twice and re-run the full pipeline.
#[async_trait]
pub trait JobQueue: Send + Sync {
    async fn enqueue(&self, job: IngestionJob) -> Result<(), JobQueueError>;

    /// Dequeue the next job, waiting until one is available.
    async fn dequeue(&self) -> Result<IngestionJob, JobQueueError>;

    async fn try_dequeue(&self) -> Result<Option<IngestionJob>, JobQueueError>;

    /// Remove a job that has not started executing yet. This is the only
    /// supported form of cancellation.
    async fn remove(&self, file_id: &str) -> Result<bool, JobQueueError>;

    async fn len(&self) -> Result<usize, JobQueueError>;
}
