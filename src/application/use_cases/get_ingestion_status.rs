use std::sync::Arc;

use crate::application::ports::status_store::{StatusStore, StatusStoreError, status_key};
use crate::domain::value_objects::IngestionState;

#[derive(Debug)]
pub enum GetStatusError {
    StatusError(String),
    /// The store holds a value that is not a known state string.
    CorruptState(String),
}

impl std::fmt::Display for GetStatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GetStatusError::StatusError(msg) => write!(f, "Status error: {}", msg),
            GetStatusError::CorruptState(msg) => write!(f, "Corrupt state: {}", msg),
        }
    }
}

impl std::error::Error for GetStatusError {}

impl From<StatusStoreError> for GetStatusError {
    fn from(error: StatusStoreError) -> Self {
        GetStatusError::StatusError(error.to_string())
    }
}

/// Status query surface: `processing`, `processed`, `failed`, or absent
/// for a file id the store has never seen.
pub struct GetIngestionStatusUseCase {
    status_store: Arc<dyn StatusStore>,
}

impl GetIngestionStatusUseCase {
    pub fn new(status_store: Arc<dyn StatusStore>) -> Self {
        Self { status_store }
    }

    pub async fn execute(&self, file_id: &str) -> Result<Option<IngestionState>, GetStatusError> {
        match self.status_store.get(&status_key(file_id)).await? {
            Some(value) => IngestionState::from_str(&value)
                .map(Some)
                .map_err(GetStatusError::CorruptState),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::test_support::{EventLog, InMemoryStatusStore};

    #[tokio::test]
    async fn test_unknown_file_id_reads_as_absent() {
        let store = Arc::new(InMemoryStatusStore::new(EventLog::default()));
        let use_case = GetIngestionStatusUseCase::new(store);

        assert_eq!(use_case.execute("1700-unknown").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_states_round_trip_through_the_store() {
        let store = Arc::new(InMemoryStatusStore::new(EventLog::default()));
        let use_case = GetIngestionStatusUseCase::new(store.clone());

        for state in [
            IngestionState::Processing,
            IngestionState::Processed,
            IngestionState::Failed,
        ] {
            store
                .set(&status_key("1700-report.pdf"), state.as_str())
                .await
                .unwrap();
            assert_eq!(
                use_case.execute("1700-report.pdf").await.unwrap(),
                Some(state)
            );
        }
    }

    #[tokio::test]
    async fn test_unknown_value_is_a_corrupt_state() {
        let store = Arc::new(InMemoryStatusStore::new(EventLog::default()));
        store
            .set(&status_key("1700-report.pdf"), "exploded")
            .await
            .unwrap();
        let use_case = GetIngestionStatusUseCase::new(store);

        assert!(matches!(
            use_case.execute("1700-report.pdf").await,
            Err(GetStatusError::CorruptState(_))
        ));
    }
}
