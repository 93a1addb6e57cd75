use std::sync::Arc;

use crate::application::services::chat_service::{ChatAnswer, ChatService, ChatServiceError};
use crate::domain::repositories::vector_repository::VectorScope;

#[derive(Debug)]
pub enum ChatError {
    ValidationError(String),
    ServiceError(String),
}

impl std::fmt::Display for ChatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ChatError::ServiceError(msg) => write!(f, "Chat error: {}", msg),
        }
    }
}

impl std::error::Error for ChatError {}

impl From<ChatServiceError> for ChatError {
    fn from(error: ChatServiceError) -> Self {
        ChatError::ServiceError(error.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub message: String,
    pub file_id: String,
    pub email: Option<String>,
}

pub struct ChatWithDocumentsUseCase {
    chat_service: Arc<ChatService>,
}

impl ChatWithDocumentsUseCase {
    pub fn new(chat_service: Arc<ChatService>) -> Self {
        Self { chat_service }
    }

    pub async fn execute(&self, request: ChatRequest) -> Result<ChatAnswer, ChatError> {
        if request.message.trim().is_empty() {
            return Err(ChatError::ValidationError(
                "please provide your queries".to_string(),
            ));
        }
        if request.file_id.trim().is_empty() {
            return Err(ChatError::ValidationError(
                "file id is required".to_string(),
            ));
        }

        let scope = VectorScope {
            file_id: request.file_id,
            owner_email: request.email,
        };

        Ok(self.chat_service.answer(&request.message, &scope).await?)
    }
}
