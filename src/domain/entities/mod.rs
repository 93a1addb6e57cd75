pub mod chat_turn;
pub mod document_chunk;
pub mod ingestion_job;
pub mod vector_record;

pub use chat_turn::{ChatRole, ChatTurn};
pub use document_chunk::DocumentChunk;
pub use ingestion_job::IngestionJob;
pub use vector_record::VectorRecord;
