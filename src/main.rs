mod application;
mod domain;
mod infrastructure;
mod presentation;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use infrastructure::container::AppContainer;
use presentation::http::HttpServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .try_init()
        .ok();

    let container = AppContainer::new().await?;

    let port = std::env::var("PORT").ok().and_then(|p| p.parse().ok());

    HttpServer::new(
        container.ingestion_handler.clone(),
        container.chat_handler.clone(),
        container.worker_pool.clone(),
        container.retention_sweeper.clone(),
        port,
    )
    .run()
    .await
}
