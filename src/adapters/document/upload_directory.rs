//! Temporary storage for uploaded files.
//!
//! Uploads are written under a generated name so client file names never
//! reach the filesystem, and removed once their text has been extracted.

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// Directory holding uploads while they are being processed.
#[derive(Debug, Clone)]
pub struct UploadDirectory {
    root: PathBuf,
}

/// An upload written to disk.
#[derive(Debug)]
pub struct StoredUpload {
    path: PathBuf,
}

impl UploadDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `bytes` to a fresh file, creating the directory if needed.
    pub async fn store(&self, bytes: &[u8]) -> io::Result<StoredUpload> {
        fs::create_dir_all(&self.root).await?;
        let path = self.root.join(format!("upload-{}", Uuid::new_v4()));
        fs::write(&path, bytes).await?;
        Ok(StoredUpload { path })
    }
}

impl StoredUpload {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deletes the file. Failures are logged and otherwise ignored.
    pub async fn remove(self) {
        if let Err(e) = fs::remove_file(&self.path).await {
            tracing::debug!(path = %self.path.display(), error = %e, "Failed to remove upload");
        }
    }
}
