//! Document adapters - text extraction from uploaded files.
//!
//! - `PlainTextExtractor` - Reads UTF-8 text, rejects binary office formats
//! - `UploadDirectory` - Temporary on-disk home for uploads

mod plain_text_extractor;
mod upload_directory;

pub use plain_text_extractor::PlainTextExtractor;
pub use upload_directory::{StoredUpload, UploadDirectory};
