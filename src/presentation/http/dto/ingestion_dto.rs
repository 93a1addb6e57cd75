use serde::{Deserialize, Serialize};

use crate::application::use_cases::submit_file::SubmitFileResponse;
use crate::application::use_cases::submit_url::SubmitUrlResponse;
use crate::domain::value_objects::IngestionState;

#[derive(Debug, Serialize)]
pub struct SubmitResponseDto {
    pub message: String,
    #[serde(rename = "fileId")]
    pub file_id: String,
}

impl From<SubmitFileResponse> for SubmitResponseDto {
    fn from(response: SubmitFileResponse) -> Self {
        Self {
            message: response.message,
            file_id: response.file_id,
        }
    }
}

impl From<SubmitUrlResponse> for SubmitResponseDto {
    fn from(response: SubmitUrlResponse) -> Self {
        Self {
            message: response.message,
            file_id: response.file_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct IngestUrlRequestDto {
    pub url: String,
    pub email: Option<String>,
}

/// `status` is one of the three state strings, or null for a file id
/// the store has never seen.
#[derive(Debug, Serialize)]
pub struct StatusResponseDto {
    pub status: Option<String>,
}

impl StatusResponseDto {
    pub fn from_state(state: Option<IngestionState>) -> Self {
        Self {
            status: state.map(|s| s.as_str().to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CancelResponseDto {
    #[serde(rename = "fileId")]
    pub file_id: String,
    pub removed: bool,
}
