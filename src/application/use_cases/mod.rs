pub mod cancel_ingestion;
pub mod chat_with_documents;
pub mod get_ingestion_status;
pub mod submit_file;
pub mod submit_url;

#[cfg(test)]
pub mod test_support;

pub use cancel_ingestion::CancelIngestionUseCase;
pub use chat_with_documents::ChatWithDocumentsUseCase;
pub use get_ingestion_status::GetIngestionStatusUseCase;
pub use submit_file::SubmitFileUseCase;
pub use submit_url::SubmitUrlUseCase;

/// How a submit use case hands a job to the pipeline: enqueue and
/// return, or run it inline before responding (degraded synchronous
/// mode, `SYNC_INGESTION=true`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    Queued,
    Inline,
}

impl DispatchMode {
    pub fn from_env() -> Self {
        match std::env::var("SYNC_INGESTION").ok().as_deref() {
            Some("true") | Some("1") => DispatchMode::Inline,
            _ => DispatchMode::Queued,
        }
    }
}
