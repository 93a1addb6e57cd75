pub mod container;
pub mod database;
pub mod external_services;
pub mod file_system;
pub mod messaging;

// Re-export commonly used items
pub use database::{DbPool, create_connection_pool};
pub use external_services::InferenceEmbeddingProvider;
pub use file_system::UploadStore;
