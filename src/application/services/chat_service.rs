use std::sync::Arc;

use crate::application::ports::chat_model::{ChatMessage, ChatModel, ChatModelError};
use crate::application::services::retrieval_service::{RetrievalError, RetrievalService};
use crate::application::services::retrieval_service::DEFAULT_TOP_K;
use crate::domain::entities::{ChatRole, ChatTurn};
use crate::domain::repositories::chat_history_repository::{
    ChatHistoryRepository, ChatHistoryRepositoryError,
};
use crate::domain::repositories::vector_repository::{RetrievedChunk, VectorScope};

/// Turns of prior conversation included in the model call.
const HISTORY_LIMIT: i64 = 10;

#[derive(Debug)]
pub enum ChatServiceError {
    Retrieval(RetrievalError),
    Model(ChatModelError),
    History(ChatHistoryRepositoryError),
}

impl std::fmt::Display for ChatServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatServiceError::Retrieval(e) => write!(f, "{}", e),
            ChatServiceError::Model(e) => write!(f, "{}", e),
            ChatServiceError::History(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ChatServiceError {}

impl From<RetrievalError> for ChatServiceError {
    fn from(error: RetrievalError) -> Self {
        ChatServiceError::Retrieval(error)
    }
}

impl From<ChatModelError> for ChatServiceError {
    fn from(error: ChatModelError) -> Self {
        ChatServiceError::Model(error)
    }
}

impl From<ChatHistoryRepositoryError> for ChatServiceError {
    fn from(error: ChatHistoryRepositoryError) -> Self {
        ChatServiceError::History(error)
    }
}

#[derive(Debug)]
pub struct ChatAnswer {
    pub message: String,
    pub sources: Vec<RetrievedChunk>,
}

/// Answers a question against one ingested document: scoped retrieval,
/// the last turns of history, one model call, then both new turns
/// appended to the history.
pub struct ChatService {
    retrieval_service: Arc<RetrievalService>,
    chat_model: Arc<dyn ChatModel>,
    chat_history: Arc<dyn ChatHistoryRepository>,
}

impl ChatService {
    pub fn new(
        retrieval_service: Arc<RetrievalService>,
        chat_model: Arc<dyn ChatModel>,
        chat_history: Arc<dyn ChatHistoryRepository>,
    ) -> Self {
        Self {
            retrieval_service,
            chat_model,
            chat_history,
        }
    }

    pub async fn answer(
        &self,
        question: &str,
        scope: &VectorScope,
    ) -> Result<ChatAnswer, ChatServiceError> {
        let sources = self
            .retrieval_service
            .retrieve(question, scope, DEFAULT_TOP_K)
            .await?;

        let history = self
            .chat_history
            .recent(scope.owner_email.as_deref(), &scope.file_id, HISTORY_LIMIT)
            .await?;

        let messages = build_messages(question, &sources, &history);
        let message = self.chat_model.complete(&messages).await?;

        self.chat_history
            .append(&ChatTurn::new(
                scope.owner_email.clone(),
                scope.file_id.clone(),
                ChatRole::User,
                question.to_string(),
            ))
            .await?;
        self.chat_history
            .append(&ChatTurn::new(
                scope.owner_email.clone(),
                scope.file_id.clone(),
                ChatRole::Assistant,
                message.clone(),
            ))
            .await?;

        Ok(ChatAnswer { message, sources })
    }
}

fn build_messages(
    question: &str,
    sources: &[RetrievedChunk],
    history: &[ChatTurn],
) -> Vec<ChatMessage> {
    let context = if sources.is_empty() {
        "No document context is available. Ask the user to upload a document first.".to_string()
    } else {
        sources
            .iter()
            .map(|source| source.chunk_text.as_str())
            .collect::<Vec<_>>()
            .join("\n---\n")
    };

    let mut messages = vec![ChatMessage::system(format!(
        "You are a support assistant answering questions about one ingested \
         document. Answer only from the context below; when the context does \
         not contain the answer, say you don't know. Keep answers short.\n\n\
         Context:\n{}",
        context
    ))];

    for turn in history {
        messages.push(match turn.role() {
            ChatRole::User => ChatMessage::user(turn.message().to_string()),
            ChatRole::Assistant => ChatMessage::assistant(turn.message().to_string()),
        });
    }

    messages.push(ChatMessage::user(question.to_string()));
    messages
}
