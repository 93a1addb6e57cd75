use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::{ChatRole, ChatTurn};
use crate::infrastructure::database::schema::chat_turns;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = chat_turns)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ChatTurnModel {
    pub id: Uuid,
    pub owner_email: Option<String>,
    pub reference_id: String,
    pub role: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = chat_turns)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewChatTurnModel {
    pub id: Uuid,
    pub owner_email: Option<String>,
    pub reference_id: String,
    pub role: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl From<&ChatTurn> for NewChatTurnModel {
    fn from(turn: &ChatTurn) -> Self {
        Self {
            id: turn.id(),
            owner_email: turn.owner_email().map(|e| e.to_string()),
            reference_id: turn.reference_id().to_string(),
            role: turn.role().as_str().to_string(),
            message: turn.message().to_string(),
            created_at: turn.created_at(),
        }
    }
}

impl TryFrom<ChatTurnModel> for ChatTurn {
    type Error = String;

    fn try_from(model: ChatTurnModel) -> Result<Self, Self::Error> {
        let role = ChatRole::from_str(&model.role)?;

        Ok(ChatTurn::from_database(
            model.id,
            model.owner_email,
            model.reference_id,
            role,
            model.message,
            model.created_at,
        ))
    }
}
