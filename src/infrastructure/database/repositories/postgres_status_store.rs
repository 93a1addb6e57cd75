use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_types::{BigInt, Double, Text};

use crate::application::ports::status_store::{StatusStore, StatusStoreError};
use crate::infrastructure::database::models::NewStatusEntryModel;
use crate::infrastructure::database::schema::status_entries;

/// Key/value store on the `status_entries` table. Status keys are plain
/// last-write-wins strings without expiry; rate-limit counters live in
/// the same table with an expiring window, bumped by a single atomic
/// upsert so concurrent requests never lose increments.
pub struct PostgresStatusStore {
    pool: Pool<ConnectionManager<PgConnection>>,
}

impl PostgresStatusStore {
    pub fn new(pool: Pool<ConnectionManager<PgConnection>>) -> Self {
        Self { pool }
    }

    fn get_connection(
        &self,
    ) -> Result<diesel::r2d2::PooledConnection<ConnectionManager<PgConnection>>, StatusStoreError>
    {
        self.pool.get().map_err(|e| {
            StatusStoreError::StorageError(format!("Failed to get database connection: {}", e))
        })
    }
}

#[derive(QueryableByName)]
struct CountRow {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

#[async_trait]
impl StatusStore for PostgresStatusStore {
    async fn set(&self, key: &str, value: &str) -> Result<(), StatusStoreError> {
        let entry = NewStatusEntryModel {
            key: key.to_string(),
            value: value.to_string(),
            expires_at: None,
        };
        let mut conn = self.get_connection()?;

        tokio::task::spawn_blocking(move || {
            diesel::insert_into(status_entries::table)
                .values(&entry)
                .on_conflict(status_entries::key)
                .do_update()
                .set((
                    status_entries::value.eq(&entry.value),
                    status_entries::expires_at.eq(None::<DateTime<Utc>>),
                ))
                .execute(&mut conn)
                .map_err(|e| StatusStoreError::StorageError(format!("Failed to set key: {}", e)))
        })
        .await
        .map_err(|e| StatusStoreError::StorageError(format!("Task join error: {}", e)))??;

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StatusStoreError> {
        let key = key.to_string();
        let mut conn = self.get_connection()?;

        tokio::task::spawn_blocking(move || {
            status_entries::table
                .filter(status_entries::key.eq(key))
                .filter(
                    status_entries::expires_at
                        .is_null()
                        .or(status_entries::expires_at.gt(Utc::now())),
                )
                .select(status_entries::value)
                .first::<String>(&mut conn)
                .optional()
                .map_err(|e| StatusStoreError::StorageError(format!("Failed to get key: {}", e)))
        })
        .await
        .map_err(|e| StatusStoreError::StorageError(format!("Task join error: {}", e)))?
    }

    async fn increment_with_expiry(
        &self,
        key: &str,
        window_seconds: i64,
    ) -> Result<i64, StatusStoreError> {
        let key = key.to_string();
        let mut conn = self.get_connection()?;

        let row = tokio::task::spawn_blocking(move || {
            // One statement so increment and window reset are atomic. An
            // expired window starts over at 1; a live window keeps its
            // original deadline.
            diesel::sql_query(
                "INSERT INTO status_entries (key, value, expires_at) \
                 VALUES ($1, '1', now() + make_interval(secs => $2)) \
                 ON CONFLICT (key) DO UPDATE SET \
                     value = CASE \
                         WHEN status_entries.expires_at IS NOT NULL \
                              AND status_entries.expires_at <= now() \
                         THEN '1' \
                         ELSE (status_entries.value::bigint + 1)::text \
                     END, \
                     expires_at = CASE \
                         WHEN status_entries.expires_at IS NOT NULL \
                              AND status_entries.expires_at <= now() \
                         THEN now() + make_interval(secs => $2) \
                         ELSE status_entries.expires_at \
                     END \
                 RETURNING value::bigint AS count",
            )
            .bind::<Text, _>(key)
            .bind::<Double, _>(window_seconds as f64)
            .get_result::<CountRow>(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::DeserializationError(inner) => {
                    StatusStoreError::ValueError(inner.to_string())
                }
                other => StatusStoreError::StorageError(format!("Failed to increment: {}", other)),
            })
        })
        .await
        .map_err(|e| StatusStoreError::StorageError(format!("Task join error: {}", e)))??;

        Ok(row.count)
    }
}
