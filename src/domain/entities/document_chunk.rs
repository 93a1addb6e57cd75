use serde_json::Value;

/// A bounded slice of loaded text, tagged with the job that produced it.
/// Chunks live only for the duration of one ingestion run; what persists
/// is the embedded `VectorRecord` built from each chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentChunk {
    text: String,
    metadata: Value,
    file_id: String,
    owner_email: Option<String>,
}

impl DocumentChunk {
    pub fn new(text: String, metadata: Value, file_id: String, owner_email: Option<String>) -> Self {
        Self {
            text,
            metadata,
            file_id,
            owner_email,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn metadata(&self) -> &Value {
        &self.metadata
    }

    pub fn file_id(&self) -> &str {
        &self.file_id
    }

    pub fn owner_email(&self) -> Option<&str> {
        self.owner_email.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}
