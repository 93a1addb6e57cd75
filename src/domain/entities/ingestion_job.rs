use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::SourceKind;

/// One ingestion job, created at request time and immutable once queued.
///
/// The two variants mirror the queue payload wire formats exactly:
/// `{"filename", "destination", "path", "fileType", "fileId", "email"}`
/// for an uploaded file and `{"url", "email", "fileId"}` for a URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IngestionJob {
    File {
        filename: String,
        destination: String,
        path: String,
        #[serde(rename = "fileType")]
        file_type: String,
        #[serde(rename = "fileId")]
        file_id: String,
        email: Option<String>,
    },
    Url {
        url: String,
        email: Option<String>,
        #[serde(rename = "fileId")]
        file_id: String,
    },
}

impl IngestionJob {
    pub fn new_file(
        filename: String,
        destination: String,
        path: String,
        file_type: String,
        email: Option<String>,
    ) -> Self {
        let file_id = generate_file_id(&filename);
        IngestionJob::File {
            filename,
            destination,
            path,
            file_type,
            file_id,
            email,
        }
    }

    pub fn new_url(url: String, email: Option<String>) -> Self {
        let label = url::Url::parse(&url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_string()))
            .unwrap_or_else(|| "url".to_string());
        IngestionJob::Url {
            url,
            email,
            file_id: generate_file_id(&label),
        }
    }

    pub fn file_id(&self) -> &str {
        match self {
            IngestionJob::File { file_id, .. } => file_id,
            IngestionJob::Url { file_id, .. } => file_id,
        }
    }

    pub fn email(&self) -> Option<&str> {
        match self {
            IngestionJob::File { email, .. } => email.as_deref(),
            IngestionJob::Url { email, .. } => email.as_deref(),
        }
    }

    /// Path of the temporary source file, for file jobs only. The job
    /// owns this file exclusively until the worker deletes it.
    pub fn temp_path(&self) -> Option<&str> {
        match self {
            IngestionJob::File { path, .. } => Some(path),
            IngestionJob::Url { .. } => None,
        }
    }

    /// Source label for logging: the declared file type, or "url".
    pub fn source_label(&self) -> &str {
        match self {
            IngestionJob::File { file_type, .. } => file_type,
            IngestionJob::Url { .. } => SourceKind::Url.as_str(),
        }
    }
}

/// Time-prefixed identifier scoping every record the job produces.
pub fn generate_file_id(name: &str) -> String {
    format!("{}-{}", Utc::now().timestamp_millis(), sanitize(name))
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
