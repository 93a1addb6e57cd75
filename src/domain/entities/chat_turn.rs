use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "user" => Ok(ChatRole::User),
            "assistant" => Ok(ChatRole::Assistant),
            other => Err(format!("Invalid chat role: {}", other)),
        }
    }
}

/// One turn of a conversation held against an ingested document.
/// Append-only; read back in created_at order, capped to the most
/// recent turns.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
    id: Uuid,
    owner_email: Option<String>,
    reference_id: String,
    role: ChatRole,
    message: String,
    created_at: DateTime<Utc>,
}

impl ChatTurn {
    pub fn new(
        owner_email: Option<String>,
        reference_id: String,
        role: ChatRole,
        message: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_email,
            reference_id,
            role,
            message,
            created_at: Utc::now(),
        }
    }

    pub fn from_database(
        id: Uuid,
        owner_email: Option<String>,
        reference_id: String,
        role: ChatRole,
        message: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner_email,
            reference_id,
            role,
            message,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn owner_email(&self) -> Option<&str> {
        self.owner_email.as_deref()
    }

    pub fn reference_id(&self) -> &str {
        &self.reference_id
    }

    pub fn role(&self) -> ChatRole {
        self.role
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
