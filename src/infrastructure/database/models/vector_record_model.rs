use chrono::{DateTime, Utc};
use diesel::prelude::*;
use pgvector::Vector;
use uuid::Uuid;

use crate::domain::entities::VectorRecord;
use crate::infrastructure::database::schema::document_vectors;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = document_vectors)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct VectorRecordModel {
    pub id: Uuid,
    pub file_id: String,
    pub owner_email: Option<String>,
    pub chunk_text: String,
    pub metadata: serde_json::Value,
    pub embedding: Vector,
    pub inserted_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = document_vectors)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewVectorRecordModel {
    pub id: Uuid,
    pub file_id: String,
    pub owner_email: Option<String>,
    pub chunk_text: String,
    pub metadata: serde_json::Value,
    pub embedding: Vector,
    pub inserted_at: DateTime<Utc>,
}

impl From<&VectorRecord> for NewVectorRecordModel {
    fn from(record: &VectorRecord) -> Self {
        Self {
            id: record.id(),
            file_id: record.file_id().to_string(),
            owner_email: record.owner_email().map(|e| e.to_string()),
            chunk_text: record.chunk_text().to_string(),
            metadata: record.metadata().clone(),
            embedding: record.embedding().clone(),
            inserted_at: record.inserted_at(),
        }
    }
}

impl From<VectorRecordModel> for VectorRecord {
    fn from(model: VectorRecordModel) -> Self {
        VectorRecord::from_database(
            model.id,
            model.file_id,
            model.owner_email,
            model.chunk_text,
            model.metadata,
            model.embedding,
            model.inserted_at,
        )
    }
}
