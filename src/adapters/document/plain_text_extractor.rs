//! Plain-text document extractor.
//!
//! Reads uploaded files as UTF-8. Binary office formats are rejected.

use async_trait::async_trait;
use std::path::Path;
use tokio::fs;

use crate::ports::{DocumentExtractor, ExtractionError};

/// Extensions that need a binary parser this extractor does not have.
const UNSUPPORTED_EXTENSIONS: &[&str] = &["pdf", "docx"];

/// Extracts text from `.txt` and other UTF-8 files.
#[derive(Debug, Clone, Default)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

#[async_trait]
impl DocumentExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path, original_name: &str) -> Result<String, ExtractionError> {
        if let Some(extension) = extension_of(original_name) {
            if UNSUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
                return Err(ExtractionError::UnsupportedFormat { extension });
            }
        }

        let bytes = fs::read(path)
            .await
            .map_err(|e| ExtractionError::Io(e.to_string()))?;

        match String::from_utf8(bytes) {
            Ok(text) => Ok(text),
            Err(_) => {
                tracing::warn!(file = original_name, "Uploaded file is not valid UTF-8");
                Ok(String::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file_with(bytes: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file
    }

    #[tokio::test]
    async fn reads_txt_file() {
        let file = file_with("line one\nligne deux é\n".as_bytes());

        let text = PlainTextExtractor::new().extract(file.path(), "notes.txt").await.unwrap();

        assert_eq!(text, "line one\nligne deux é\n");
    }

    #[tokio::test]
    async fn reads_unknown_extension_as_text() {
        let file = file_with(b"# heading");

        let text = PlainTextExtractor::new().extract(file.path(), "README.md").await.unwrap();

        assert_eq!(text, "# heading");
    }

    #[tokio::test]
    async fn binary_content_yields_empty_text() {
        let file = file_with(&[0xff, 0xfe, 0x00, 0x9f]);

        let text = PlainTextExtractor::new().extract(file.path(), "blob.bin").await.unwrap();

        assert!(text.is_empty());
    }

    #[tokio::test]
    async fn pdf_and_docx_are_unsupported() {
        let file = file_with(b"%PDF-1.4");
        let extractor = PlainTextExtractor::new();

        for name in ["report.pdf", "Letter.DOCX"] {
            let err = extractor.extract(file.path(), name).await.unwrap_err();
            assert!(matches!(err, ExtractionError::UnsupportedFormat { .. }));
        }
    }

    #[tokio::test]
    async fn legacy_doc_is_read_as_text() {
        let file = file_with(b"plain words");

        let text = PlainTextExtractor::new().extract(file.path(), "old.doc").await.unwrap();

        assert_eq!(text, "plain words");
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();

        let err = PlainTextExtractor::new()
            .extract(&dir.path().join("gone.txt"), "gone.txt")
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractionError::Io(_)));
    }
}
