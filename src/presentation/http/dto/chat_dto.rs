use serde::{Deserialize, Serialize};

use crate::application::services::chat_service::ChatAnswer;
use crate::domain::repositories::vector_repository::RetrievedChunk;

#[derive(Debug, Deserialize)]
pub struct ChatRequestDto {
    pub message: String,
    #[serde(rename = "fileId")]
    pub file_id: String,
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponseDto {
    pub message: String,
    pub docs: Vec<RetrievedChunkDto>,
}

#[derive(Debug, Serialize)]
pub struct RetrievedChunkDto {
    pub text: String,
    pub metadata: serde_json::Value,
    pub distance: f64,
}

impl From<RetrievedChunk> for RetrievedChunkDto {
    fn from(chunk: RetrievedChunk) -> Self {
        Self {
            text: chunk.chunk_text,
            metadata: chunk.metadata,
            distance: chunk.distance,
        }
    }
}

impl From<ChatAnswer> for ChatResponseDto {
    fn from(answer: ChatAnswer) -> Self {
        Self {
            message: answer.message,
            docs: answer
                .sources
                .into_iter()
                .map(RetrievedChunkDto::from)
                .collect(),
        }
    }
}
