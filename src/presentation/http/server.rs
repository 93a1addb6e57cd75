use axum::Router;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::infrastructure::messaging::{IngestionWorkerPool, RetentionSweeper};
use crate::presentation::http::{
    handlers::{ChatHandler, IngestionHandler},
    routes::{chat_routes, health_routes, ingestion_routes},
};

pub struct HttpServer {
    ingestion_handler: Arc<IngestionHandler>,
    chat_handler: Arc<ChatHandler>,
    worker_pool: Arc<IngestionWorkerPool>,
    retention_sweeper: Arc<RetentionSweeper>,
    port: u16,
}

impl HttpServer {
    pub fn new(
        ingestion_handler: Arc<IngestionHandler>,
        chat_handler: Arc<ChatHandler>,
        worker_pool: Arc<IngestionWorkerPool>,
        retention_sweeper: Arc<RetentionSweeper>,
        port: Option<u16>,
    ) -> Self {
        Self {
            ingestion_handler,
            chat_handler,
            worker_pool,
            retention_sweeper,
            port: port.unwrap_or(3000),
        }
    }

    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        // Start the worker pool and the retention sweeper
        let worker_pool = self.worker_pool.clone();
        tokio::spawn(async move {
            worker_pool.start().await;
        });

        let retention_sweeper = self.retention_sweeper.clone();
        tokio::spawn(async move {
            retention_sweeper.start().await;
        });

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let app = Router::new()
            .merge(health_routes())
            .merge(ingestion_routes(self.ingestion_handler.clone()))
            .merge(chat_routes(self.chat_handler.clone()))
            .layer(cors)
            .layer(RequestBodyLimitLayer::new(250 * 1024 * 1024)) // 250MB cap
            .layer(
                TraceLayer::new_for_http()
                    .on_request(
                        |request: &axum::http::Request<axum::body::Body>, _span: &tracing::Span| {
                            tracing::info!(
                                "Received request: {} {}",
                                request.method(),
                                request.uri()
                            );
                        },
                    )
                    .on_response(
                        |response: &axum::http::Response<axum::body::Body>,
                         latency: std::time::Duration,
                         _span: &tracing::Span| {
                            tracing::info!(
                                "Response: {} (took {} ms)",
                                response.status(),
                                latency.as_millis()
                            );
                        },
                    )
                    .on_failure(
                        |error: ServerErrorsFailureClass,
                         latency: std::time::Duration,
                         _span: &tracing::Span| {
                            tracing::error!(
                                "Request failed: {:?} (took {} ms)",
                                error,
                                latency.as_millis()
                            );
                        },
                    ),
            );

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));

        tracing::info!(port = self.port, "http server listening");
        let listener = TcpListener::bind(addr).await?;
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await?;

        Ok(())
    }
}
