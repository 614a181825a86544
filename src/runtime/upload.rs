//! Image upload collaborator

use thiserror::Error;

/// A file picked by the author for upload
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

// Bytes are elided so message traces stay readable
impl std::fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadFile")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("size", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("upload rejected by server: {0}")]
    Rejected(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Stores an image somewhere and returns the URL it can be served from.
///
/// Called on a worker thread; may block.
pub trait ImageUploader: Send + Sync {
    fn upload(&self, file: &UploadFile) -> Result<String, UploadError>;
}

impl<F> ImageUploader for F
where
    F: Fn(&UploadFile) -> Result<String, UploadError> + Send + Sync,
{
    fn upload(&self, file: &UploadFile) -> Result<String, UploadError> {
        self(file)
    }
}

/// Uploader used when the host wires none: every upload fails
#[derive(Debug, Default, Clone, Copy)]
pub struct NoUploader;

impl ImageUploader for NoUploader {
    fn upload(&self, _file: &UploadFile) -> Result<String, UploadError> {
        Err(UploadError::Rejected("no upload service configured".to_string()))
    }
}
