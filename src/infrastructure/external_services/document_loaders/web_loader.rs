use std::time::Duration;

use html2text::from_read;
use regex::Regex;
use serde_json::json;
use url::Url;

use crate::application::ports::document_loader::{DocumentLoadError, LoadedDocument};

const FETCH_TIMEOUT_SECS: u64 = 15;
const RENDER_WIDTH: usize = 80;

/// Fetches a web page, renders the HTML to text, strips any residual
/// markup and collapses whitespace into single spaces. One page yields
/// one segment.
pub struct WebLoader {
    client: reqwest::Client,
    residual_tags: Regex,
    whitespace: Regex,
}

impl WebLoader {
    pub fn new() -> Result<Self, DocumentLoadError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .map_err(|e| DocumentLoadError::LoadFailed(e.to_string()))?;

        let residual_tags = Regex::new(r"<[^>]+>")
            .map_err(|e| DocumentLoadError::LoadFailed(e.to_string()))?;
        let whitespace =
            Regex::new(r"\s+").map_err(|e| DocumentLoadError::LoadFailed(e.to_string()))?;

        Ok(Self {
            client,
            residual_tags,
            whitespace,
        })
    }

    pub async fn load_url(&self, url: &str) -> Result<Vec<LoadedDocument>, DocumentLoadError> {
        Url::parse(url)
            .map_err(|e| DocumentLoadError::LoadFailed(format!("Invalid URL: {}", e)))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DocumentLoadError::LoadFailed(format!("Failed to fetch URL: {}", e)))?;

        if !response.status().is_success() {
            return Err(DocumentLoadError::LoadFailed(format!(
                "URL returned status {}",
                response.status()
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| DocumentLoadError::LoadFailed(format!("Failed to read response: {}", e)))?;

        let text = self.text_from_html(&html)?;

        Ok(vec![LoadedDocument {
            text,
            metadata: json!({ "source": url }),
        }])
    }

    fn text_from_html(&self, html: &str) -> Result<String, DocumentLoadError> {
        let rendered = from_read(html.as_bytes(), RENDER_WIDTH).map_err(|e| {
            DocumentLoadError::LoadFailed(format!("Failed to convert HTML to text: {}", e))
        })?;

        let stripped = self.residual_tags.replace_all(&rendered, "");
        let collapsed = self.whitespace.replace_all(&stripped, " ");

        Ok(collapsed.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markup_stripped_and_whitespace_collapsed() {
        let loader = WebLoader::new().unwrap();
        let html = "<html><body>\
                    <h1>Title</h1>\
                    <p>First   line.</p>\n\n<p>Second\nline.</p>\
                    </body></html>";

        let text = loader.text_from_html(html).unwrap();

        assert!(!text.contains('<'));
        assert!(!text.contains("\n"));
        assert!(!text.contains("  "));
        assert!(text.contains("Title"));
        assert!(text.contains("First line."));
        assert!(text.contains("Second line."));
    }

    #[test]
    fn test_empty_body_yields_empty_text() {
        let loader = WebLoader::new().unwrap();
        let text = loader.text_from_html("<html><body></body></html>").unwrap();
        assert!(text.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_url_is_a_load_failure() {
        let loader = WebLoader::new().unwrap();
        let result = loader.load_url("not a url").await;
        assert!(matches!(result, Err(DocumentLoadError::LoadFailed(_))));
    }
}
