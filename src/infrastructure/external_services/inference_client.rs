use async_trait::async_trait;
use pgvector::Vector;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::application::ports::embedding_provider::{EmbeddingProvider, EmbeddingProviderError};

#[derive(Serialize)]
struct EmbeddingsRequest {
    text: TextInput,
}

#[derive(Serialize)]
#[serde(untagged)]
enum TextInput {
    Multiple(Vec<String>),
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    embeddings: Vec<Vector>,
}

#[derive(Debug, Clone)]
pub struct EmbeddingsClientConfig {
    pub service_url: String,
    pub max_retries: u32,
    pub timeout_secs: u64,
    pub backoff_factor: f64,
    pub dimension: usize,
}

impl Default for EmbeddingsClientConfig {
    fn default() -> Self {
        let service_url = env::var("EMBEDDINGS_SERVICE_URL")
            .unwrap_or_else(|_| "http://localhost:8081/embeddings".to_string());
        let dimension = env::var("EMBEDDING_DIMENSION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1536);

        Self {
            service_url,
            max_retries: 3,
            timeout_secs: 30,
            backoff_factor: 1.5,
            dimension,
        }
    }
}

#[derive(Debug)]
enum EmbeddingsError {
    RequestError(String),
    ParseError(String),
    MaxRetriesExceeded,
}

/// HTTP client for the remote embedding service, with its own request
/// timeout and a bounded retry loop with exponential backoff.
pub struct InferenceClient {
    client: reqwest::Client,
    config: EmbeddingsClientConfig,
}

impl InferenceClient {
    pub fn new(config: EmbeddingsClientConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, reqwest::Error> {
        Self::new(EmbeddingsClientConfig::default())
    }

    async fn get_embeddings(&self, texts: &[String]) -> Result<Vec<Vector>, EmbeddingsError> {
        let request = EmbeddingsRequest {
            text: TextInput::Multiple(texts.to_vec()),
        };

        let mut attempts = 0;

        loop {
            attempts += 1;

            match self.execute_request(&request).await {
                Ok(response) => return Ok(response.embeddings),
                Err(e) => {
                    if attempts > self.config.max_retries {
                        tracing::warn!(error = %describe(&e), "embedding request exhausted retries");
                        return Err(EmbeddingsError::MaxRetriesExceeded);
                    }

                    let backoff = Duration::from_millis(
                        (self.config.backoff_factor.powi(attempts as i32 - 1) * 1000.0) as u64,
                    );
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }

    async fn execute_request(
        &self,
        request: &EmbeddingsRequest,
    ) -> Result<EmbeddingsResponse, EmbeddingsError> {
        let response = self
            .client
            .post(&self.config.service_url)
            .json(request)
            .send()
            .await
            .map_err(|e| EmbeddingsError::RequestError(e.without_url().to_string()))?;

        if !response.status().is_success() {
            return Err(EmbeddingsError::RequestError(format!(
                "Embedding service returned status {}",
                response.status()
            )));
        }

        response
            .json::<EmbeddingsResponse>()
            .await
            .map_err(|e| EmbeddingsError::ParseError(e.to_string()))
    }
}

fn describe(error: &EmbeddingsError) -> String {
    match error {
        EmbeddingsError::RequestError(msg) => format!("request error: {}", msg),
        EmbeddingsError::ParseError(msg) => format!("parse error: {}", msg),
        EmbeddingsError::MaxRetriesExceeded => "max retries exceeded".to_string(),
    }
}

/// Adapter exposing the inference client through the provider port.
pub struct InferenceEmbeddingProvider {
    client: InferenceClient,
}

impl InferenceEmbeddingProvider {
    pub fn new(client: InferenceClient) -> Self {
        Self { client }
    }

    pub fn from_env() -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: InferenceClient::from_env()?,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for InferenceEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vector, EmbeddingProviderError> {
        let mut embeddings = self.embed_batch(&[text.to_string()]).await?;

        if embeddings.is_empty() {
            return Err(EmbeddingProviderError::ApiError(
                "No embeddings returned".to_string(),
            ));
        }

        Ok(embeddings.remove(0))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vector>, EmbeddingProviderError> {
        let embeddings = self
            .client
            .get_embeddings(texts)
            .await
            .map_err(|e| match e {
                EmbeddingsError::RequestError(msg) => EmbeddingProviderError::NetworkError(msg),
                EmbeddingsError::ParseError(msg) => EmbeddingProviderError::ApiError(msg),
                EmbeddingsError::MaxRetriesExceeded => EmbeddingProviderError::ServiceUnavailable,
            })?;

        if embeddings.len() != texts.len() {
            return Err(EmbeddingProviderError::ApiError(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                embeddings.len()
            )));
        }

        Ok(embeddings)
    }

    fn embedding_dimension(&self) -> usize {
        self.client.config.dimension
    }
}
