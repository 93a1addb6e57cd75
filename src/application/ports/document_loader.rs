use async_trait::async_trait;
use serde_json::Value;

/// What a loader is asked to read: a temporary file on disk with its
/// declared type, or a remote page.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestionSource {
    File { path: String, file_type: String },
    Url { url: String },
}

#[derive(Debug)]
pub enum DocumentLoadError {
    /// The declared source kind has no loader. Permanent; never retried.
    UnsupportedSourceKind(String),
    /// I/O or network failure while reading the source. Surfaced to the
    /// worker; re-enqueueing the job is the retry path.
    LoadFailed(String),
    IoError(String),
}

impl std::fmt::Display for DocumentLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentLoadError::UnsupportedSourceKind(kind) => {
                write!(f, "Unsupported source kind: {}", kind)
            }
            DocumentLoadError::LoadFailed(msg) => write!(f, "Load failed: {}", msg),
            DocumentLoadError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for DocumentLoadError {}

/// One text segment produced by a loader: a PDF page, a DOCX body, or a
/// rendered web page, with whatever metadata the loader knows about it.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDocument {
    pub text: String,
    pub metadata: Value,
}

#[async_trait]
pub trait DocumentLoader: Send + Sync {
    async fn load(&self, source: &IngestionSource)
    -> Result<Vec<LoadedDocument>, DocumentLoadError>;
}
