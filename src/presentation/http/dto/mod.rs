pub mod chat_dto;
pub mod ingestion_dto;
pub mod response_dto;

pub use chat_dto::{ChatRequestDto, ChatResponseDto};
pub use ingestion_dto::{
    CancelResponseDto, IngestUrlRequestDto, StatusResponseDto, SubmitResponseDto,
};
pub use response_dto::{ApiResponse, HealthResponseDto};
