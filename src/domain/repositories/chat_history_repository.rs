use async_trait::async_trait;

use crate::domain::entities::ChatTurn;

#[derive(Debug)]
pub enum ChatHistoryRepositoryError {
    DatabaseError(String),
}

impl std::fmt::Display for ChatHistoryRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatHistoryRepositoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for ChatHistoryRepositoryError {}

#[async_trait]
pub trait ChatHistoryRepository: Send + Sync {
    async fn append(&self, turn: &ChatTurn) -> Result<(), ChatHistoryRepositoryError>;

    /// The last `limit` turns for one owner/reference pair, oldest first.
    async fn recent(
        &self,
        owner_email: Option<&str>,
        reference_id: &str,
        limit: i64,
    ) -> Result<Vec<ChatTurn>, ChatHistoryRepositoryError>;
}
