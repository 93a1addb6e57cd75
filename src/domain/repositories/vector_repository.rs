use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pgvector::Vector;

use crate::domain::entities::VectorRecord;

#[derive(Debug)]
pub enum VectorRepositoryError {
    DatabaseError(String),
    ValidationError(String),
}

impl std::fmt::Display for VectorRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VectorRepositoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            VectorRepositoryError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for VectorRepositoryError {}

/// Scope applied to every read against the vector store. Filtering by
/// both keys is a correctness requirement, not an optimization: records
/// from another file id or another owner must never be returned.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorScope {
    pub file_id: String,
    pub owner_email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RetrievedChunk {
    pub chunk_text: String,
    pub metadata: serde_json::Value,
    pub distance: f64,
}

#[async_trait]
pub trait VectorRepository: Send + Sync {
    async fn save_batch(&self, records: &[VectorRecord]) -> Result<(), VectorRepositoryError>;

    /// Nearest-neighbor search over embeddings, restricted to `scope`.
    async fn similarity_search(
        &self,
        query: &Vector,
        k: i64,
        scope: &VectorScope,
    ) -> Result<Vec<RetrievedChunk>, VectorRepositoryError>;

    /// Predicate delete of everything inserted before `cutoff`. Returns
    /// the number of deleted records; running against a clean store is a
    /// no-op returning zero.
    async fn delete_older_than(&self, cutoff: DateTime<Utc>)
    -> Result<u64, VectorRepositoryError>;

    async fn count_by_file(&self, file_id: &str) -> Result<i64, VectorRepositoryError>;
}
