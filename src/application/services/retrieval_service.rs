use std::sync::Arc;

use crate::application::ports::embedding_provider::{EmbeddingProvider, EmbeddingProviderError};
use crate::domain::repositories::vector_repository::{
    RetrievedChunk, VectorRepository, VectorRepositoryError, VectorScope,
};

/// Matches returned per query; mirrors the retriever the chat flow was
/// built around.
pub const DEFAULT_TOP_K: i64 = 2;

#[derive(Debug)]
pub enum RetrievalError {
    Embedding(EmbeddingProviderError),
    VectorStore(VectorRepositoryError),
}

impl std::fmt::Display for RetrievalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RetrievalError::Embedding(e) => write!(f, "{}", e),
            RetrievalError::VectorStore(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RetrievalError {}

/// Embeds a query and searches the vector store within an owner + file
/// scope. The scope is mandatory: retrieval never crosses file or owner
/// boundaries.
pub struct RetrievalService {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_repository: Arc<dyn VectorRepository>,
}

impl RetrievalService {
    pub fn new(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        vector_repository: Arc<dyn VectorRepository>,
    ) -> Self {
        Self {
            embedding_provider,
            vector_repository,
        }
    }

    pub async fn retrieve(
        &self,
        query: &str,
        scope: &VectorScope,
        k: i64,
    ) -> Result<Vec<RetrievedChunk>, RetrievalError> {
        let query_embedding = self
            .embedding_provider
            .embed(query)
            .await
            .map_err(RetrievalError::Embedding)?;

        self.vector_repository
            .similarity_search(&query_embedding, k, scope)
            .await
            .map_err(RetrievalError::VectorStore)
    }
}
