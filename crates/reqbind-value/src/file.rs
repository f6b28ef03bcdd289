//! Uploaded file descriptors

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A file received in a multipart request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// Original file name as sent by the client
    pub client_name: String,

    /// Location of the stored upload
    pub path: PathBuf,

    /// Client-provided media type
    #[serde(default)]
    pub mime_type: Option<String>,

    /// Size in bytes
    #[serde(default)]
    pub size: u64,

    /// Upload error code (0 means the upload succeeded)
    #[serde(default)]
    pub error: u8,
}

impl UploadedFile {
    /// Create a descriptor for a successful upload
    pub fn new(client_name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            client_name: client_name.into(),
            path: path.into(),
            mime_type: None,
            size: 0,
            error: 0,
        }
    }

    /// Set the media type
    #[must_use]
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Set the size in bytes
    #[must_use]
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    /// Set the upload error code
    #[must_use]
    pub fn with_error(mut self, error: u8) -> Self {
        self.error = error;
        self
    }

    /// Path of the stored file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the upload completed without error
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.error == 0
    }
}
