use chrono::{DateTime, Utc};
use pgvector::Vector;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::entities::DocumentChunk;

/// The persisted form of one embedded chunk. The `file_id` and `email`
/// keys are folded into the metadata map so downstream filters can rely
/// on both keys existing — email is an explicit null when absent.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorRecord {
    id: Uuid,
    file_id: String,
    owner_email: Option<String>,
    chunk_text: String,
    metadata: Value,
    embedding: Vector,
    inserted_at: DateTime<Utc>,
}

impl VectorRecord {
    pub fn from_chunk(chunk: &DocumentChunk, embedding: Vector) -> Self {
        let mut metadata = match chunk.metadata() {
            Value::Object(map) => map.clone(),
            _ => serde_json::Map::new(),
        };
        metadata.insert(
            "file_id".to_string(),
            Value::String(chunk.file_id().to_string()),
        );
        metadata.insert(
            "email".to_string(),
            match chunk.owner_email() {
                Some(email) => Value::String(email.to_string()),
                None => Value::Null,
            },
        );

        Self {
            id: Uuid::new_v4(),
            file_id: chunk.file_id().to_string(),
            owner_email: chunk.owner_email().map(|e| e.to_string()),
            chunk_text: chunk.text().to_string(),
            metadata: Value::Object(metadata),
            embedding,
            inserted_at: Utc::now(),
        }
    }

    pub fn from_database(
        id: Uuid,
        file_id: String,
        owner_email: Option<String>,
        chunk_text: String,
        metadata: Value,
        embedding: Vector,
        inserted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            file_id,
            owner_email,
            chunk_text,
            metadata,
            embedding,
            inserted_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn file_id(&self) -> &str {
        &self.file_id
    }

    pub fn owner_email(&self) -> Option<&str> {
        self.owner_email.as_deref()
    }

    pub fn chunk_text(&self) -> &str {
        &self.chunk_text
    }

    pub fn metadata(&self) -> &Value {
        &self.metadata
    }

    pub fn embedding(&self) -> &Vector {
        &self.embedding
    }

    pub fn inserted_at(&self) -> DateTime<Utc> {
        self.inserted_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metadata_gains_scope_keys() {
        let chunk = DocumentChunk::new(
            "text".to_string(),
            json!({"page": 1, "source": "report.pdf"}),
            "1700-report.pdf".to_string(),
            Some("a@b.com".to_string()),
        );
        let record = VectorRecord::from_chunk(&chunk, Vector::from(vec![0.0, 1.0]));

        assert_eq!(record.metadata()["page"], 1);
        assert_eq!(record.metadata()["file_id"], "1700-report.pdf");
        assert_eq!(record.metadata()["email"], "a@b.com");
        assert_eq!(record.file_id(), "1700-report.pdf");
    }

    #[test]
    fn test_missing_owner_becomes_null_sentinel() {
        let chunk = DocumentChunk::new("text".to_string(), json!({}), "id-1".to_string(), None);
        let record = VectorRecord::from_chunk(&chunk, Vector::from(vec![0.5]));

        let map = record.metadata().as_object().unwrap();
        assert!(map.contains_key("email"));
        assert!(map["email"].is_null());
        assert!(record.owner_email().is_none());
    }
}
