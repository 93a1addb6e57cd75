use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use pgvector::{Vector, VectorExpressionMethods};

use crate::domain::entities::VectorRecord;
use crate::domain::repositories::vector_repository::{
    RetrievedChunk, VectorRepository, VectorRepositoryError, VectorScope,
};
use crate::infrastructure::database::models::NewVectorRecordModel;
use crate::infrastructure::database::schema::document_vectors;

pub struct PostgresVectorRepository {
    pool: Pool<ConnectionManager<PgConnection>>,
}

impl PostgresVectorRepository {
    pub fn new(pool: Pool<ConnectionManager<PgConnection>>) -> Self {
        Self { pool }
    }

    fn get_connection(
        &self,
    ) -> Result<diesel::r2d2::PooledConnection<ConnectionManager<PgConnection>>, VectorRepositoryError>
    {
        self.pool.get().map_err(|e| {
            VectorRepositoryError::DatabaseError(format!(
                "Failed to get database connection: {}",
                e
            ))
        })
    }
}

#[async_trait]
impl VectorRepository for PostgresVectorRepository {
    async fn save_batch(&self, records: &[VectorRecord]) -> Result<(), VectorRepositoryError> {
        if records.is_empty() {
            return Ok(());
        }

        let models: Vec<NewVectorRecordModel> =
            records.iter().map(NewVectorRecordModel::from).collect();
        let mut conn = self.get_connection()?;

        tokio::task::spawn_blocking(move || {
            diesel::insert_into(document_vectors::table)
                .values(&models)
                .execute(&mut conn)
                .map_err(|e| {
                    VectorRepositoryError::DatabaseError(format!("Failed to save batch: {}", e))
                })
        })
        .await
        .map_err(|e| VectorRepositoryError::DatabaseError(format!("Task join error: {}", e)))??;

        Ok(())
    }

    async fn similarity_search(
        &self,
        query: &Vector,
        k: i64,
        scope: &VectorScope,
    ) -> Result<Vec<RetrievedChunk>, VectorRepositoryError> {
        let query = query.clone();
        let scope = scope.clone();
        let mut conn = self.get_connection()?;

        let rows = tokio::task::spawn_blocking(move || {
            // Both scope keys are always applied; an anonymous scope
            // matches only records written without an owner.
            let mut statement = document_vectors::table
                .filter(document_vectors::file_id.eq(scope.file_id))
                .into_boxed();

            statement = match scope.owner_email {
                Some(email) => statement.filter(document_vectors::owner_email.eq(email)),
                None => statement.filter(document_vectors::owner_email.is_null()),
            };

            statement
                .select((
                    document_vectors::chunk_text,
                    document_vectors::metadata,
                    document_vectors::embedding.cosine_distance(query.clone()),
                ))
                .order(document_vectors::embedding.cosine_distance(query))
                .limit(k)
                .load::<(String, serde_json::Value, f64)>(&mut conn)
                .map_err(|e| {
                    VectorRepositoryError::DatabaseError(format!("Similarity search failed: {}", e))
                })
        })
        .await
        .map_err(|e| VectorRepositoryError::DatabaseError(format!("Task join error: {}", e)))??;

        Ok(rows
            .into_iter()
            .map(|(chunk_text, metadata, distance)| RetrievedChunk {
                chunk_text,
                metadata,
                distance,
            })
            .collect())
    }

    async fn delete_older_than(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, VectorRepositoryError> {
        let mut conn = self.get_connection()?;

        let deleted = tokio::task::spawn_blocking(move || {
            diesel::delete(
                document_vectors::table.filter(document_vectors::inserted_at.lt(cutoff)),
            )
            .execute(&mut conn)
            .map_err(|e| {
                VectorRepositoryError::DatabaseError(format!("Retention delete failed: {}", e))
            })
        })
        .await
        .map_err(|e| VectorRepositoryError::DatabaseError(format!("Task join error: {}", e)))??;

        Ok(deleted as u64)
    }

    async fn count_by_file(&self, file_id: &str) -> Result<i64, VectorRepositoryError> {
        let file_id = file_id.to_string();
        let mut conn = self.get_connection()?;

        tokio::task::spawn_blocking(move || {
            document_vectors::table
                .filter(document_vectors::file_id.eq(file_id))
                .count()
                .get_result::<i64>(&mut conn)
                .map_err(|e| {
                    VectorRepositoryError::DatabaseError(format!("Count failed: {}", e))
                })
        })
        .await
        .map_err(|e| VectorRepositoryError::DatabaseError(format!("Task join error: {}", e)))?
    }
}
