pub mod chat_model;
pub mod document_loader;
pub mod embedding_provider;
pub mod job_queue;
pub mod status_store;
pub mod url_probe;

pub use chat_model::ChatModel;
pub use document_loader::DocumentLoader;
pub use embedding_provider::EmbeddingProvider;
pub use job_queue::JobQueue;
pub use status_store::StatusStore;
pub use url_probe::UrlProbe;
