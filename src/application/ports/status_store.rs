use async_trait::async_trait;

#[derive(Debug)]
pub enum StatusStoreError {
    StorageError(String),
    ValueError(String),
}

impl std::fmt::Display for StatusStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusStoreError::StorageError(msg) => write!(f, "Storage error: {}", msg),
            StatusStoreError::ValueError(msg) => write!(f, "Value error: {}", msg),
        }
    }
}

impl std::error::Error for StatusStoreError {}

/// Process-external key/value store. Primary use is the per-job status
/// string under `status:<fileId>` (last write wins); the expiring
/// counters back the rate limiter.
#[async_trait]
pub trait StatusStore: Send + Sync {
    async fn set(&self, key: &str, value: &str) -> Result<(), StatusStoreError>;

    /// A missing or expired key reads as `None`.
    async fn get(&self, key: &str) -> Result<Option<String>, StatusStoreError>;

    /// Atomically increments the counter under `key`, starting a fresh
    /// window of `window_seconds` when the key is new or expired.
    /// Returns the count within the current window.
    async fn increment_with_expiry(
        &self,
        key: &str,
        window_seconds: i64,
    ) -> Result<i64, StatusStoreError>;
}

pub fn status_key(file_id: &str) -> String {
    format!("status:{}", file_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_key_shape() {
        assert_eq!(status_key("1700-report.pdf"), "status:1700-report.pdf");
    }
}
