use serde::{Deserialize, Serialize};

/// Lifecycle of one ingestion job as reported by the status store.
/// `Processing` is written before the job is queued; the worker writes
/// one of the two terminal states exactly once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IngestionState {
    Processing,
    Processed,
    Failed,
}

impl IngestionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestionState::Processing => "processing",
            IngestionState::Processed => "processed",
            IngestionState::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "processing" => Ok(IngestionState::Processing),
            "processed" => Ok(IngestionState::Processed),
            "failed" => Ok(IngestionState::Failed),
            other => Err(format!("Invalid ingestion state: {}", other)),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, IngestionState::Processed | IngestionState::Failed)
    }
}

impl std::fmt::Display for IngestionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_round_trip() {
        for state in [
            IngestionState::Processing,
            IngestionState::Processed,
            IngestionState::Failed,
        ] {
            assert_eq!(IngestionState::from_str(state.as_str()), Ok(state));
        }
    }

    #[test]
    fn test_unknown_state_rejected() {
        assert!(IngestionState::from_str("pending").is_err());
        assert!(IngestionState::from_str("").is_err());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!IngestionState::Processing.is_terminal());
        assert!(IngestionState::Processed.is_terminal());
        assert!(IngestionState::Failed.is_terminal());
    }
}
