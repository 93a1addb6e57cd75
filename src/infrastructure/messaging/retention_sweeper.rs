use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::domain::repositories::vector_repository::{VectorRepository, VectorRepositoryError};

const DEFAULT_PERIOD_SECS: u64 = 60 * 60;
const DEFAULT_RETENTION_HOURS: i64 = 24;

/// Periodic predicate delete of vector records older than the retention
/// window. Sweeping an already-clean store deletes nothing; a failed
/// sweep is logged and the next tick runs as scheduled.
pub struct RetentionSweeper {
    vector_repository: Arc<dyn VectorRepository>,
    period: Duration,
    retention: chrono::Duration,
}

impl RetentionSweeper {
    pub fn new(vector_repository: Arc<dyn VectorRepository>) -> Self {
        Self {
            vector_repository,
            period: Duration::from_secs(DEFAULT_PERIOD_SECS),
            retention: chrono::Duration::hours(DEFAULT_RETENTION_HOURS),
        }
    }

    /// Reads `RETENTION_HOURS`, keeping the hourly tick.
    pub fn from_env(vector_repository: Arc<dyn VectorRepository>) -> Self {
        let hours = std::env::var("RETENTION_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_RETENTION_HOURS);

        Self::new(vector_repository).with_retention(chrono::Duration::hours(hours))
    }

    pub fn with_retention(mut self, retention: chrono::Duration) -> Self {
        self.retention = retention;
        self
    }

    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    pub async fn start(&self) {
        tracing::info!(
            period_secs = self.period.as_secs(),
            retention_hours = self.retention.num_hours(),
            "starting retention sweeper"
        );

        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick fires immediately; skip it so startup does not
        // race the migration run.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            match self.sweep_once().await {
                Ok(deleted) => {
                    tracing::info!(deleted, "retention sweep finished");
                }
                Err(error) => {
                    tracing::error!(error = %error, "retention sweep failed");
                }
            }
        }
    }

    /// One sweep against the store. Records inserted exactly at the
    /// cutoff are retained; only strictly older ones are deleted.
    pub async fn sweep_once(&self) -> Result<u64, VectorRepositoryError> {
        let cutoff = Utc::now() - self.retention;
        self.vector_repository.delete_older_than(cutoff).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::sync::Mutex;

    use crate::domain::entities::VectorRecord;
    use crate::domain::repositories::vector_repository::{RetrievedChunk, VectorScope};

    struct TimestampRepository {
        inserted_at: Mutex<Vec<DateTime<Utc>>>,
    }

    impl TimestampRepository {
        fn with_ages(ages: &[chrono::Duration]) -> Self {
            let now = Utc::now();
            Self {
                inserted_at: Mutex::new(ages.iter().map(|age| now - *age).collect()),
            }
        }

        fn remaining(&self) -> usize {
            self.inserted_at.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl VectorRepository for TimestampRepository {
        async fn save_batch(
            &self,
            _records: &[VectorRecord],
        ) -> Result<(), VectorRepositoryError> {
            Ok(())
        }

        async fn similarity_search(
            &self,
            _query: &pgvector::Vector,
            _k: i64,
            _scope: &VectorScope,
        ) -> Result<Vec<RetrievedChunk>, VectorRepositoryError> {
            Ok(Vec::new())
        }

        async fn delete_older_than(
            &self,
            cutoff: DateTime<Utc>,
        ) -> Result<u64, VectorRepositoryError> {
            let mut timestamps = self.inserted_at.lock().unwrap();
            let before = timestamps.len();
            timestamps.retain(|inserted| *inserted >= cutoff);
            Ok((before - timestamps.len()) as u64)
        }

        async fn count_by_file(&self, _file_id: &str) -> Result<i64, VectorRepositoryError> {
            Ok(0)
        }
    }

    struct FailingRepository;

    #[async_trait]
    impl VectorRepository for FailingRepository {
        async fn save_batch(
            &self,
            _records: &[VectorRecord],
        ) -> Result<(), VectorRepositoryError> {
            Ok(())
        }

        async fn similarity_search(
            &self,
            _query: &pgvector::Vector,
            _k: i64,
            _scope: &VectorScope,
        ) -> Result<Vec<RetrievedChunk>, VectorRepositoryError> {
            Ok(Vec::new())
        }

        async fn delete_older_than(
            &self,
            _cutoff: DateTime<Utc>,
        ) -> Result<u64, VectorRepositoryError> {
            Err(VectorRepositoryError::DatabaseError(
                "connection refused".to_string(),
            ))
        }

        async fn count_by_file(&self, _file_id: &str) -> Result<i64, VectorRepositoryError> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn test_sweep_deletes_only_records_past_the_window() {
        let repository = Arc::new(TimestampRepository::with_ages(&[
            chrono::Duration::hours(48),
            chrono::Duration::hours(1),
        ]));
        let sweeper = RetentionSweeper::new(repository.clone());

        let deleted = sweeper.sweep_once().await.unwrap();

        assert_eq!(deleted, 1);
        assert_eq!(repository.remaining(), 1);
    }

    #[tokio::test]
    async fn test_sweep_is_idempotent() {
        let repository = Arc::new(TimestampRepository::with_ages(&[chrono::Duration::hours(
            48,
        )]));
        let sweeper = RetentionSweeper::new(repository.clone());

        assert_eq!(sweeper.sweep_once().await.unwrap(), 1);
        assert_eq!(sweeper.sweep_once().await.unwrap(), 0);
        assert_eq!(repository.remaining(), 0);
    }

    #[tokio::test]
    async fn test_sweep_error_is_surfaced_not_panicked() {
        let sweeper = RetentionSweeper::new(Arc::new(FailingRepository));
        assert!(sweeper.sweep_once().await.is_err());
    }

    #[tokio::test]
    async fn test_custom_window() {
        let repository = Arc::new(TimestampRepository::with_ages(&[
            chrono::Duration::hours(2),
            chrono::Duration::minutes(30),
        ]));
        let sweeper =
            RetentionSweeper::new(repository.clone()).with_retention(chrono::Duration::hours(1));

        assert_eq!(sweeper.sweep_once().await.unwrap(), 1);
        assert_eq!(repository.remaining(), 1);
    }
}
