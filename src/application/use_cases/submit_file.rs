use std::sync::Arc;

use crate::application::ports::status_store::{StatusStore, StatusStoreError, status_key};
use crate::application::ports::{JobQueue, job_queue::JobQueueError};
use crate::application::use_cases::DispatchMode;
use crate::domain::entities::IngestionJob;
use crate::domain::entities::ingestion_job::generate_file_id;
use crate::domain::value_objects::IngestionState;
use crate::infrastructure::file_system::UploadStore;
use crate::infrastructure::file_system::upload_store::UploadStoreError;
use crate::infrastructure::messaging::JobRunner;

#[derive(Debug)]
pub enum SubmitFileError {
    ValidationError(String),
    StorageError(String),
    StatusError(String),
    QueueError(String),
    IngestionError(String),
}

impl std::fmt::Display for SubmitFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitFileError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            SubmitFileError::StorageError(msg) => write!(f, "Storage error: {}", msg),
            SubmitFileError::StatusError(msg) => write!(f, "Status error: {}", msg),
            SubmitFileError::QueueError(msg) => write!(f, "Queue error: {}", msg),
            SubmitFileError::IngestionError(msg) => write!(f, "Ingestion error: {}", msg),
        }
    }
}

impl std::error::Error for SubmitFileError {}

impl From<UploadStoreError> for SubmitFileError {
    fn from(error: UploadStoreError) -> Self {
        SubmitFileError::StorageError(error.to_string())
    }
}

impl From<StatusStoreError> for SubmitFileError {
    fn from(error: StatusStoreError) -> Self {
        SubmitFileError::StatusError(error.to_string())
    }
}

impl From<JobQueueError> for SubmitFileError {
    fn from(error: JobQueueError) -> Self {
        SubmitFileError::QueueError(error.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct SubmitFileRequest {
    pub file_name: String,
    pub data: Vec<u8>,
    pub email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SubmitFileResponse {
    pub file_id: String,
    pub message: String,
}

/// Accepts an uploaded file: stores the bytes, writes `processing`
/// before the job is visible anywhere, then dispatches. A file with an
/// unsupported extension is still accepted here; the worker fails it
/// and cleans up, so the caller sees the failure through the status
/// query like any other pipeline error.
pub struct SubmitFileUseCase {
    upload_store: Arc<UploadStore>,
    status_store: Arc<dyn StatusStore>,
    job_queue: Arc<dyn JobQueue>,
    job_runner: Arc<JobRunner>,
    dispatch_mode: DispatchMode,
}

impl SubmitFileUseCase {
    pub fn new(
        upload_store: Arc<UploadStore>,
        status_store: Arc<dyn StatusStore>,
        job_queue: Arc<dyn JobQueue>,
        job_runner: Arc<JobRunner>,
        dispatch_mode: DispatchMode,
    ) -> Self {
        Self {
            upload_store,
            status_store,
            job_queue,
            job_runner,
            dispatch_mode,
        }
    }

    pub async fn execute(
        &self,
        request: SubmitFileRequest,
    ) -> Result<SubmitFileResponse, SubmitFileError> {
        if request.file_name.trim().is_empty() {
            return Err(SubmitFileError::ValidationError(
                "File name cannot be empty".to_string(),
            ));
        }
        if request.data.is_empty() {
            return Err(SubmitFileError::ValidationError(
                "File is empty".to_string(),
            ));
        }

        let file_type = std::path::Path::new(&request.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .unwrap_or_default();

        let file_id = generate_file_id(&request.file_name);
        let path = self.upload_store.store(&file_id, &request.data).await?;

        let job = IngestionJob::File {
            filename: request.file_name,
            destination: self.upload_store.destination(),
            path,
            file_type,
            file_id: file_id.clone(),
            email: request.email,
        };

        // Status first: a status query must never see a job the store
        // does not know about.
        self.status_store
            .set(&status_key(&file_id), IngestionState::Processing.as_str())
            .await?;

        match self.dispatch_mode {
            DispatchMode::Queued => {
                self.job_queue.enqueue(job).await?;
                Ok(SubmitFileResponse {
                    file_id,
                    message: "uploaded".to_string(),
                })
            }
            DispatchMode::Inline => {
                self.job_runner
                    .run(&job)
                    .await
                    .map_err(|e| SubmitFileError::IngestionError(e.to_string()))?;
                Ok(SubmitFileResponse {
                    file_id,
                    message: "processed".to_string(),
                })
            }
        }
    }
}
