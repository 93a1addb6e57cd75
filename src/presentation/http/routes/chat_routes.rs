use axum::{Router, routing::post};
use std::sync::Arc;

use crate::presentation::http::handlers::ChatHandler;

pub fn chat_routes(handler: Arc<ChatHandler>) -> Router {
    Router::new()
        .route("/chat", post(ChatHandler::chat))
        .with_state(handler)
}
