use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};

use crate::domain::entities::ChatTurn;
use crate::domain::repositories::chat_history_repository::{
    ChatHistoryRepository, ChatHistoryRepositoryError,
};
use crate::infrastructure::database::models::{ChatTurnModel, NewChatTurnModel};
use crate::infrastructure::database::schema::chat_turns;

pub struct PostgresChatHistoryRepository {
    pool: Pool<ConnectionManager<PgConnection>>,
}

impl PostgresChatHistoryRepository {
    pub fn new(pool: Pool<ConnectionManager<PgConnection>>) -> Self {
        Self { pool }
    }

    fn get_connection(
        &self,
    ) -> Result<
        diesel::r2d2::PooledConnection<ConnectionManager<PgConnection>>,
        ChatHistoryRepositoryError,
    > {
        self.pool.get().map_err(|e| {
            ChatHistoryRepositoryError::DatabaseError(format!(
                "Failed to get database connection: {}",
                e
            ))
        })
    }
}

#[async_trait]
impl ChatHistoryRepository for PostgresChatHistoryRepository {
    async fn append(&self, turn: &ChatTurn) -> Result<(), ChatHistoryRepositoryError> {
        let model = NewChatTurnModel::from(turn);
        let mut conn = self.get_connection()?;

        tokio::task::spawn_blocking(move || {
            diesel::insert_into(chat_turns::table)
                .values(&model)
                .execute(&mut conn)
                .map_err(|e| {
                    ChatHistoryRepositoryError::DatabaseError(format!(
                        "Failed to append chat turn: {}",
                        e
                    ))
                })
        })
        .await
        .map_err(|e| {
            ChatHistoryRepositoryError::DatabaseError(format!("Task join error: {}", e))
        })??;

        Ok(())
    }

    async fn recent(
        &self,
        owner_email: Option<&str>,
        reference_id: &str,
        limit: i64,
    ) -> Result<Vec<ChatTurn>, ChatHistoryRepositoryError> {
        let owner_email = owner_email.map(|e| e.to_string());
        let reference_id = reference_id.to_string();
        let mut conn = self.get_connection()?;

        let models = tokio::task::spawn_blocking(move || {
            let mut statement = chat_turns::table
                .filter(chat_turns::reference_id.eq(reference_id))
                .into_boxed();

            statement = match owner_email {
                Some(email) => statement.filter(chat_turns::owner_email.eq(email)),
                None => statement.filter(chat_turns::owner_email.is_null()),
            };

            // Newest `limit` rows, flipped back to oldest-first below.
            statement
                .order(chat_turns::created_at.desc())
                .limit(limit)
                .load::<ChatTurnModel>(&mut conn)
                .map_err(|e| {
                    ChatHistoryRepositoryError::DatabaseError(format!(
                        "Failed to load chat history: {}",
                        e
                    ))
                })
        })
        .await
        .map_err(|e| {
            ChatHistoryRepositoryError::DatabaseError(format!("Task join error: {}", e))
        })??;

        let mut turns = Vec::with_capacity(models.len());
        for model in models.into_iter().rev() {
            let turn = ChatTurn::try_from(model).map_err(|e| {
                ChatHistoryRepositoryError::DatabaseError(format!(
                    "Failed to convert chat turn: {}",
                    e
                ))
            })?;
            turns.push(turn);
        }

        Ok(turns)
    }
}
