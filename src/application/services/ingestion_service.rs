use std::sync::Arc;

use crate::application::ports::document_loader::{
    DocumentLoadError, DocumentLoader, IngestionSource, LoadedDocument,
};
use crate::application::ports::embedding_provider::{EmbeddingProvider, EmbeddingProviderError};
use crate::domain::entities::{DocumentChunk, IngestionJob, VectorRecord};
use crate::domain::repositories::vector_repository::{VectorRepository, VectorRepositoryError};
use crate::infrastructure::external_services::RecursiveCharacterSplitter;

/// Upper bound on chunks per embedding request and per vector-store
/// insert, to bound request size and memory.
pub const EMBEDDING_BATCH_SIZE: usize = 100;

#[derive(Debug)]
pub enum IngestionError {
    Load(DocumentLoadError),
    Embedding(EmbeddingProviderError),
    VectorStore(VectorRepositoryError),
}

impl std::fmt::Display for IngestionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestionError::Load(e) => write!(f, "{}", e),
            IngestionError::Embedding(e) => write!(f, "{}", e),
            IngestionError::VectorStore(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for IngestionError {}

impl From<DocumentLoadError> for IngestionError {
    fn from(error: DocumentLoadError) -> Self {
        IngestionError::Load(error)
    }
}

impl From<EmbeddingProviderError> for IngestionError {
    fn from(error: EmbeddingProviderError) -> Self {
        IngestionError::Embedding(error)
    }
}

impl From<VectorRepositoryError> for IngestionError {
    fn from(error: VectorRepositoryError) -> Self {
        IngestionError::VectorStore(error)
    }
}

/// Runs one job through the load → split → embed → persist pipeline.
/// Insertion is additive: re-running a job writes a second copy of its
/// chunks under the same file id, which scoped retrieval tolerates.
pub struct IngestionService {
    loader: Arc<dyn DocumentLoader>,
    splitter: RecursiveCharacterSplitter,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_repository: Arc<dyn VectorRepository>,
}

impl IngestionService {
    pub fn new(
        loader: Arc<dyn DocumentLoader>,
        splitter: RecursiveCharacterSplitter,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        vector_repository: Arc<dyn VectorRepository>,
    ) -> Self {
        Self {
            loader,
            splitter,
            embedding_provider,
            vector_repository,
        }
    }

    /// Returns the number of chunks persisted for the job.
    pub async fn ingest(&self, job: &IngestionJob) -> Result<usize, IngestionError> {
        let source = source_of(job);
        let documents = self.loader.load(&source).await?;
        let chunks = self.split_documents(&documents, job.file_id(), job.email());
        self.persist(&chunks).await?;
        Ok(chunks.len())
    }

    fn split_documents(
        &self,
        documents: &[LoadedDocument],
        file_id: &str,
        owner_email: Option<&str>,
    ) -> Vec<DocumentChunk> {
        documents
            .iter()
            .flat_map(|document| {
                self.splitter
                    .split_text(&document.text)
                    .into_iter()
                    .map(|text| {
                        DocumentChunk::new(
                            text,
                            document.metadata.clone(),
                            file_id.to_string(),
                            owner_email.map(|e| e.to_string()),
                        )
                    })
                    .collect::<Vec<_>>()
            })
            .filter(|chunk| !chunk.is_empty())
            .collect()
    }

    /// Embeds and inserts in batches. A failed batch aborts the whole
    /// job; batches already written stay in the store and no
    /// partial-success bookkeeping is kept.
    async fn persist(&self, chunks: &[DocumentChunk]) -> Result<(), IngestionError> {
        for batch in chunks.chunks(EMBEDDING_BATCH_SIZE) {
            let texts: Vec<String> = batch.iter().map(|c| c.text().to_string()).collect();
            let embeddings = self.embedding_provider.embed_batch(&texts).await?;

            let records: Vec<VectorRecord> = batch
                .iter()
                .zip(embeddings)
                .map(|(chunk, embedding)| VectorRecord::from_chunk(chunk, embedding))
                .collect();

            self.vector_repository.save_batch(&records).await?;
        }

        Ok(())
    }
}

fn source_of(job: &IngestionJob) -> IngestionSource {
    match job {
        IngestionJob::File {
            path, file_type, ..
        } => IngestionSource::File {
            path: path.clone(),
            file_type: file_type.clone(),
        },
        IngestionJob::Url { url, .. } => IngestionSource::Url { url: url.clone() },
    }
}
