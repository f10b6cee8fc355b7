//! Upload storage port.

use async_trait::async_trait;

/// A file received from a client.
#[derive(Debug, Clone)]
pub struct Upload {
    /// Client-supplied name, only used for its extension.
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// Stores uploads and hands back the public path they are served under.
#[async_trait]
pub trait FileStorage: Send + Sync {
    async fn store(&self, upload: Upload) -> Result<String, StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(String),
}
