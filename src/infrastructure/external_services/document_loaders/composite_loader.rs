use async_trait::async_trait;

use crate::application::ports::document_loader::{
    DocumentLoadError, DocumentLoader, IngestionSource, LoadedDocument,
};
use crate::domain::value_objects::SourceKind;

use super::{DocxLoader, PdfLoader, WebLoader};

/// Dispatches a source to the loader for its kind. A file whose declared
/// type has no loader fails permanently with `UnsupportedSourceKind`.
pub struct CompositeDocumentLoader {
    pdf_loader: PdfLoader,
    docx_loader: DocxLoader,
    web_loader: WebLoader,
}

impl CompositeDocumentLoader {
    pub fn new() -> Result<Self, DocumentLoadError> {
        Ok(Self {
            pdf_loader: PdfLoader::new(),
            docx_loader: DocxLoader::new(),
            web_loader: WebLoader::new()?,
        })
    }
}

#[async_trait]
impl DocumentLoader for CompositeDocumentLoader {
    async fn load(
        &self,
        source: &IngestionSource,
    ) -> Result<Vec<LoadedDocument>, DocumentLoadError> {
        match source {
            IngestionSource::Url { url } => self.web_loader.load_url(url).await,
            IngestionSource::File { path, file_type } => {
                match SourceKind::from_file_type(file_type) {
                    Some(SourceKind::Pdf) => self.pdf_loader.load_path(path).await,
                    Some(SourceKind::Docx) => self.docx_loader.load_path(path).await,
                    _ => Err(DocumentLoadError::UnsupportedSourceKind(file_type.clone())),
                }
            }
        }
    }
}
