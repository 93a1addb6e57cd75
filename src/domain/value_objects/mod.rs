pub mod ingestion_state;
pub mod source_kind;

pub use ingestion_state::IngestionState;
pub use source_kind::SourceKind;
