/// The three content sources the pipeline can ingest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Pdf,
    Docx,
    Url,
}

impl SourceKind {
    /// Resolve a file-type label carried in a job payload ("pdf", "docx").
    /// Anything else is unsupported and handled by the loader as such.
    pub fn from_file_type(file_type: &str) -> Option<Self> {
        match file_type.to_lowercase().as_str() {
            "pdf" => Some(SourceKind::Pdf),
            "docx" => Some(SourceKind::Docx),
            _ => None,
        }
    }

    pub fn from_extension(file_name: &str) -> Option<Self> {
        let extension = std::path::Path::new(file_name).extension()?.to_str()?;
        Self::from_file_type(extension)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Pdf => "pdf",
            SourceKind::Docx => "docx",
            SourceKind::Url => "url",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_file_types() {
        assert_eq!(SourceKind::from_file_type("pdf"), Some(SourceKind::Pdf));
        assert_eq!(SourceKind::from_file_type("PDF"), Some(SourceKind::Pdf));
        assert_eq!(SourceKind::from_file_type("docx"), Some(SourceKind::Docx));
    }

    #[test]
    fn test_unknown_file_types() {
        assert_eq!(SourceKind::from_file_type("exe"), None);
        assert_eq!(SourceKind::from_file_type("doc"), None);
        assert_eq!(SourceKind::from_file_type(""), None);
    }

    #[test]
    fn test_from_extension() {
        assert_eq!(
            SourceKind::from_extension("report.pdf"),
            Some(SourceKind::Pdf)
        );
        assert_eq!(
            SourceKind::from_extension("notes.DOCX"),
            Some(SourceKind::Docx)
        );
        assert_eq!(SourceKind::from_extension("archive.tar.gz"), None);
        assert_eq!(SourceKind::from_extension("no_extension"), None);
    }
}
