use std::path::PathBuf;
use tokio::fs;

#[derive(Debug)]
pub enum UploadStoreError {
    IoError(String),
}

impl std::fmt::Display for UploadStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadStoreError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for UploadStoreError {}

/// Disk storage for uploaded source files, one file per job under the
/// job's file id. The file belongs to exactly one job; the worker
/// deletes it when the job reaches a terminal state.
pub struct UploadStore {
    base_path: PathBuf,
}

impl UploadStore {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn from_env() -> Self {
        let base_path =
            PathBuf::from(std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()));
        Self::new(base_path)
    }

    pub fn destination(&self) -> String {
        self.base_path.to_string_lossy().to_string()
    }

    /// Writes the uploaded bytes and returns the stored path.
    pub async fn store(&self, file_id: &str, data: &[u8]) -> Result<String, UploadStoreError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| UploadStoreError::IoError(e.to_string()))?;

        let path = self.base_path.join(file_id);
        fs::write(&path, data)
            .await
            .map_err(|e| UploadStoreError::IoError(e.to_string()))?;

        Ok(path.to_string_lossy().to_string())
    }
}
