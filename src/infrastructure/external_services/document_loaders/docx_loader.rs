use std::io::Read;

use quick_xml::events::Event;
use serde_json::json;

use crate::application::ports::document_loader::{DocumentLoadError, LoadedDocument};

/// Reads a DOCX from a local path. A .docx is a ZIP archive; the body
/// text lives in `word/document.xml` as `w:t` runs grouped into `w:p`
/// paragraphs.
pub struct DocxLoader;

impl DocxLoader {
    pub fn new() -> Self {
        Self
    }

    pub async fn load_path(&self, path: &str) -> Result<Vec<LoadedDocument>, DocumentLoadError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| DocumentLoadError::IoError(e.to_string()))?;

        let text = extract_document_text(&bytes)?;

        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        Ok(vec![LoadedDocument {
            text,
            metadata: json!({ "source": path }),
        }])
    }
}

impl Default for DocxLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn extract_document_text(bytes: &[u8]) -> Result<String, DocumentLoadError> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes))
        .map_err(|e| DocumentLoadError::LoadFailed(format!("Not a DOCX archive: {}", e)))?;

    let mut document_xml = Vec::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| DocumentLoadError::LoadFailed(format!("word/document.xml missing: {}", e)))?
        .read_to_end(&mut document_xml)
        .map_err(|e| DocumentLoadError::IoError(e.to_string()))?;

    collect_text_runs(&document_xml)
}

fn collect_text_runs(xml: &[u8]) -> Result<String, DocumentLoadError> {
    let mut reader = quick_xml::Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut out = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => in_text_run = true,
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text_run => {
                let run = t
                    .unescape()
                    .map_err(|e| DocumentLoadError::LoadFailed(format!("Bad XML text: {}", e)))?;
                out.push_str(&run);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(DocumentLoadError::LoadFailed(format!(
                    "Malformed document.xml: {}",
                    e
                )));
            }
        }
        buf.clear();
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn docx_bytes(document_xml: &str) -> Vec<u8> {
        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            writer
                .start_file("word/document.xml", SimpleFileOptions::default())
                .unwrap();
            writer.write_all(document_xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_extracts_paragraph_text_runs() {
        let xml = r#"<?xml version="1.0"?>
            <w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
              <w:body>
                <w:p><w:r><w:t>First paragraph.</w:t></w:r></w:p>
                <w:p><w:r><w:t>Second </w:t></w:r><w:r><w:t>paragraph.</w:t></w:r></w:p>
              </w:body>
            </w:document>"#;

        let text = extract_document_text(&docx_bytes(xml)).unwrap();
        assert_eq!(text, "First paragraph.\nSecond paragraph.\n");
    }

    #[test]
    fn test_invalid_archive_is_a_load_failure() {
        let result = extract_document_text(b"not a zip archive");
        assert!(matches!(result, Err(DocumentLoadError::LoadFailed(_))));
    }

    #[test]
    fn test_archive_without_document_xml_is_rejected() {
        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            writer
                .start_file("other.xml", SimpleFileOptions::default())
                .unwrap();
            writer.write_all(b"<x/>").unwrap();
            writer.finish().unwrap();
        }

        let result = extract_document_text(&cursor.into_inner());
        assert!(matches!(result, Err(DocumentLoadError::LoadFailed(_))));
    }
}
