pub mod chat_handler;
pub mod ingestion_handler;

pub use chat_handler::ChatHandler;
pub use ingestion_handler::IngestionHandler;

use axum::http::HeaderMap;
use std::net::SocketAddr;

/// Rate-limit identity: the first forwarded address when the service
/// sits behind a proxy, the peer address otherwise.
pub fn client_key(headers: &HeaderMap, addr: &SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| addr.ip().to_string())
}
