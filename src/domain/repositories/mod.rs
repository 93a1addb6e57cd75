pub mod chat_history_repository;
pub mod vector_repository;

pub use chat_history_repository::ChatHistoryRepository;
pub use vector_repository::VectorRepository;
