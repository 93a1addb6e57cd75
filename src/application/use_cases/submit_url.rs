use std::sync::Arc;

use crate::application::ports::status_store::{StatusStore, StatusStoreError, status_key};
use crate::application::ports::{JobQueue, UrlProbe, job_queue::JobQueueError};
use crate::application::use_cases::DispatchMode;
use crate::domain::entities::IngestionJob;
use crate::domain::value_objects::IngestionState;
use crate::infrastructure::messaging::JobRunner;

#[derive(Debug)]
pub enum SubmitUrlError {
    ValidationError(String),
    /// The URL is unreachable or does not serve HTML. No job exists.
    NotScrapable(String),
    StatusError(String),
    QueueError(String),
    IngestionError(String),
}

impl std::fmt::Display for SubmitUrlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitUrlError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            SubmitUrlError::NotScrapable(url) => write!(f, "Url is not scrapable: {}", url),
            SubmitUrlError::StatusError(msg) => write!(f, "Status error: {}", msg),
            SubmitUrlError::QueueError(msg) => write!(f, "Queue error: {}", msg),
            SubmitUrlError::IngestionError(msg) => write!(f, "Ingestion error: {}", msg),
        }
    }
}

impl std::error::Error for SubmitUrlError {}

impl From<StatusStoreError> for SubmitUrlError {
    fn from(error: StatusStoreError) -> Self {
        SubmitUrlError::StatusError(error.to_string())
    }
}

impl From<JobQueueError> for SubmitUrlError {
    fn from(error: JobQueueError) -> Self {
        SubmitUrlError::QueueError(error.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct SubmitUrlRequest {
    pub url: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SubmitUrlResponse {
    pub file_id: String,
    pub message: String,
}

/// Accepts a URL for scraping. The reachability probe runs before any
/// state exists, so a rejected URL leaves no job, no status entry and
/// no vectors behind.
pub struct SubmitUrlUseCase {
    url_probe: Arc<dyn UrlProbe>,
    status_store: Arc<dyn StatusStore>,
    job_queue: Arc<dyn JobQueue>,
    job_runner: Arc<JobRunner>,
    dispatch_mode: DispatchMode,
}

impl SubmitUrlUseCase {
    pub fn new(
        url_probe: Arc<dyn UrlProbe>,
        status_store: Arc<dyn StatusStore>,
        job_queue: Arc<dyn JobQueue>,
        job_runner: Arc<JobRunner>,
        dispatch_mode: DispatchMode,
    ) -> Self {
        Self {
            url_probe,
            status_store,
            job_queue,
            job_runner,
            dispatch_mode,
        }
    }

    pub async fn execute(
        &self,
        request: SubmitUrlRequest,
    ) -> Result<SubmitUrlResponse, SubmitUrlError> {
        if request.url.trim().is_empty() {
            return Err(SubmitUrlError::ValidationError(
                "URL cannot be empty".to_string(),
            ));
        }
        if url::Url::parse(&request.url).is_err() {
            return Err(SubmitUrlError::ValidationError(
                "Invalid URL format".to_string(),
            ));
        }

        if !self.url_probe.is_scrapable(&request.url).await {
            return Err(SubmitUrlError::NotScrapable(request.url));
        }

        let job = IngestionJob::new_url(request.url, request.email);
        let file_id = job.file_id().to_string();

        self.status_store
            .set(&status_key(&file_id), IngestionState::Processing.as_str())
            .await?;

        match self.dispatch_mode {
            DispatchMode::Queued => {
                self.job_queue.enqueue(job).await?;
                Ok(SubmitUrlResponse {
                    file_id,
                    message: "queued".to_string(),
                })
            }
            DispatchMode::Inline => {
                self.job_runner
                    .run(&job)
                    .await
                    .map_err(|e| SubmitUrlError::IngestionError(e.to_string()))?;
                Ok(SubmitUrlResponse {
                    file_id,
                    message: "processed".to_string(),
                })
            }
        }
    }
}
