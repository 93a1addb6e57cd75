pub mod chat_service;
pub mod ingestion_service;
pub mod rate_limiter;
pub mod retrieval_service;

pub use chat_service::ChatService;
pub use ingestion_service::IngestionService;
pub use rate_limiter::RateLimiter;
pub use retrieval_service::RetrievalService;
