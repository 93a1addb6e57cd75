use axum::{Router, routing::delete, routing::get, routing::post};
use std::sync::Arc;

use crate::presentation::http::handlers::IngestionHandler;

pub fn ingestion_routes(handler: Arc<IngestionHandler>) -> Router {
    Router::new()
        .route("/upload", post(IngestionHandler::upload_file))
        .route("/ingest/url", post(IngestionHandler::ingest_url))
        .route("/ingest/{file_id}", delete(IngestionHandler::cancel_ingestion))
        .route("/status/{file_id}", get(IngestionHandler::get_status))
        .with_state(handler)
}
