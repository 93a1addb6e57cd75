use lopdf::Document;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde_json::json;

use crate::application::ports::document_loader::{DocumentLoadError, LoadedDocument};

/// Reads a PDF from a local path and produces one text segment per page,
/// tagged with the page number.
pub struct PdfLoader;

impl PdfLoader {
    pub fn new() -> Self {
        Self
    }

    pub async fn load_path(&self, path: &str) -> Result<Vec<LoadedDocument>, DocumentLoadError> {
        let path = path.to_string();

        tokio::task::spawn_blocking(move || Self::extract_pages(&path))
            .await
            .map_err(|e| DocumentLoadError::LoadFailed(format!("Task join error: {}", e)))?
    }

    fn extract_pages(path: &str) -> Result<Vec<LoadedDocument>, DocumentLoadError> {
        let doc = Document::load(path)
            .map_err(|e| DocumentLoadError::LoadFailed(format!("Failed to read PDF: {}", e)))?;

        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();

        let extracted: Vec<Result<(u32, String), String>> = page_numbers
            .into_par_iter()
            .map(|page_num| {
                let text = doc.extract_text(&[page_num]).map_err(|e| {
                    format!("Failed to extract text from page {}: {}", page_num, e)
                })?;
                Ok((page_num, text))
            })
            .collect();

        let mut documents = Vec::new();
        let mut errors = Vec::new();

        for page_result in extracted {
            match page_result {
                Ok((page_num, text)) => {
                    if text.trim().is_empty() {
                        continue;
                    }
                    documents.push(LoadedDocument {
                        text,
                        metadata: json!({ "source": path, "page": page_num }),
                    });
                }
                Err(e) => errors.push(e),
            }
        }

        if documents.is_empty() && !errors.is_empty() {
            return Err(DocumentLoadError::LoadFailed(errors.join("; ")));
        }

        Ok(documents)
    }
}

impl Default for PdfLoader {
    fn default() -> Self {
        Self::new()
    }
}
