//! Upload configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Upload handling configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UploadsConfig {
    /// Directory for uploads awaiting extraction
    #[serde(default = "default_dir")]
    pub dir: PathBuf,

    /// Largest accepted request body, in bytes
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
}

impl UploadsConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_bytes == 0 {
            return Err(ValidationError::InvalidUploadLimit);
        }
        Ok(())
    }
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            max_bytes: default_max_bytes(),
        }
    }
}

fn default_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_max_bytes() -> usize {
    16 * 1024 * 1024
}
