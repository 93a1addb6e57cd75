use std::sync::Arc;

use crate::application::ports::{JobQueue, job_queue::JobQueueError};

#[derive(Debug)]
pub enum CancelIngestionError {
    QueueError(String),
}

impl std::fmt::Display for CancelIngestionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CancelIngestionError::QueueError(msg) => write!(f, "Queue error: {}", msg),
        }
    }
}

impl std::error::Error for CancelIngestionError {}

impl From<JobQueueError> for CancelIngestionError {
    fn from(error: JobQueueError) -> Self {
        CancelIngestionError::QueueError(error.to_string())
    }
}

/// Queue-level removal, the only supported cancellation: a job can be
/// withdrawn before a worker picks it up, never mid-flight.
pub struct CancelIngestionUseCase {
    job_queue: Arc<dyn JobQueue>,
}

impl CancelIngestionUseCase {
    pub fn new(job_queue: Arc<dyn JobQueue>) -> Self {
        Self { job_queue }
    }

    /// Returns whether the job was still pending and has been removed.
    pub async fn execute(&self, file_id: &str) -> Result<bool, CancelIngestionError> {
        Ok(self.job_queue.remove(file_id).await?)
    }
}
