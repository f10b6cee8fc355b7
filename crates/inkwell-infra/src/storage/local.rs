//! Uploads written to a local directory and served statically.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use inkwell_core::ports::{FileStorage, StorageError, Upload};

/// URL prefix under which the upload directory is served.
pub const UPLOADS_PREFIX: &str = "/uploads";

/// Stores each upload under a fresh, collision-free name.
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    /// Create the storage, making sure the directory exists.
    pub fn new(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// `<millis>-<uuid>.<ext>`; the extension is kept only if it is short and
/// alphanumeric.
fn unique_file_name(original: Option<&str>) -> String {
    let extension = original
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 10)
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default();

    format!(
        "{}-{}{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple(),
        extension
    )
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn store(&self, upload: Upload) -> Result<String, StorageError> {
        let name = unique_file_name(upload.file_name.as_deref());
        let path = self.root.join(&name);

        tokio::fs::write(&path, &upload.bytes)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;

        tracing::debug!(file = %name, bytes = upload.bytes.len(), "Stored upload");
        Ok(format!("{UPLOADS_PREFIX}/{name}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_file_name_keeps_safe_extension() {
        assert!(unique_file_name(Some("photo.JPG")).ends_with(".jpg"));
        assert!(!unique_file_name(Some("archive.tar.gz/../x")).contains('/'));
        assert!(!unique_file_name(Some("noext")).contains('.'));
        assert!(!unique_file_name(None).contains('.'));
        assert_ne!(unique_file_name(Some("a.png")), unique_file_name(Some("a.png")));
    }

    #[tokio::test]
    async fn test_store_writes_file_and_returns_public_path() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path().join("uploads")).unwrap();

        let path = storage
            .store(Upload {
                file_name: Some("cover.png".to_string()),
                bytes: b"png-bytes".to_vec(),
            })
            .await
            .unwrap();

        assert!(path.starts_with("/uploads/"));
        let name = path.trim_start_matches("/uploads/");
        let written = std::fs::read(storage.root().join(name)).unwrap();
        assert_eq!(written, b"png-bytes");
    }
}
