//! Document extractor port.
//!
//! Turns an uploaded file into plain text that can be embedded in an
//! instruction.

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Port for text extraction from uploaded files.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    /// Extracts text from the file at `path`.
    ///
    /// `original_name` is the client-supplied file name and decides the
    /// format. Undecodable content yields an empty string.
    async fn extract(&self, path: &Path, original_name: &str) -> Result<String, ExtractionError>;
}

/// Document extraction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("Unsupported file format: .{extension}")]
    UnsupportedFormat { extension: String },

    #[error("Failed to read uploaded file: {0}")]
    Io(String),
}
