use async_trait::async_trait;
use std::time::Duration;

use crate::application::ports::url_probe::UrlProbe;

const PROBE_TIMEOUT_SECS: u64 = 5;

/// HEAD-based scrapability probe: the URL must be reachable with a 200
/// and serve an HTML content type. Any probe failure means "not
/// scrapable" — no job is created for a URL that fails here.
pub struct HttpUrlProbe {
    client: reqwest::Client,
}

impl HttpUrlProbe {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(PROBE_TIMEOUT_SECS))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl UrlProbe for HttpUrlProbe {
    async fn is_scrapable(&self, url: &str) -> bool {
        if url::Url::parse(url).is_err() {
            return false;
        }

        let response = match self.client.head(url).send().await {
            Ok(response) => response,
            Err(_) => return false,
        };

        if response.status() != reqwest::StatusCode::OK {
            return false;
        }

        response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|content_type| content_type.contains("text/html"))
            .unwrap_or(false)
    }
}
