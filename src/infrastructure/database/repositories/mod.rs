pub mod postgres_chat_history_repository;
pub mod postgres_status_store;
pub mod postgres_vector_repository;

pub use postgres_chat_history_repository::PostgresChatHistoryRepository;
pub use postgres_status_store::PostgresStatusStore;
pub use postgres_vector_repository::PostgresVectorRepository;
