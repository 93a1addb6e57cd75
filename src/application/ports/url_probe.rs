use async_trait::async_trait;

/// Pre-flight check for URL ingestion: a URL that is unreachable or does
/// not serve HTML is rejected before any job or status entry exists.
#[async_trait]
pub trait UrlProbe: Send + Sync {
    async fn is_scrapable(&self, url: &str) -> bool;
}
