pub mod chat_client;
pub mod document_loaders;
pub mod http_url_probe;
pub mod inference_client;
pub mod text_splitter;

pub use chat_client::HttpChatModel;
pub use http_url_probe::HttpUrlProbe;
pub use inference_client::InferenceEmbeddingProvider;
pub use text_splitter::RecursiveCharacterSplitter;
