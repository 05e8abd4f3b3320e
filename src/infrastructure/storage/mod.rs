//! Local disk storage for feed images.

use axum::body::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

pub const UPLOAD_URL_PREFIX: &str = "/uploads";

#[derive(Debug, thiserror::Error)]
pub enum ImageStoreError {
    #[error("uploaded file is empty")]
    EmptyPayload,
    #[error("uploaded file exceeds {limit} bytes")]
    TooLarge { limit: usize },
    #[error("stored path escapes the upload directory")]
    InvalidPath,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
    max_bytes: usize,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            root: root.into(),
            max_bytes,
        }
    }

    /// Write the image under a generated name and return that name.
    pub async fn store(
        &self,
        original_name: Option<&str>,
        data: Bytes,
    ) -> Result<String, ImageStoreError> {
        if data.is_empty() {
            return Err(ImageStoreError::EmptyPayload);
        }
        if data.len() > self.max_bytes {
            return Err(ImageStoreError::TooLarge {
                limit: self.max_bytes,
            });
        }

        let stored_path = match original_name.and_then(extension_of) {
            Some(ext) => format!("{}.{}", Uuid::new_v4().simple(), ext),
            None => Uuid::new_v4().simple().to_string(),
        };

        fs::create_dir_all(&self.root).await?;
        fs::write(self.root.join(&stored_path), &data).await?;

        tracing::debug!(stored_path, size = data.len(), "Stored feed image");
        Ok(stored_path)
    }

    /// Remove a stored image. Missing files are treated as success.
    pub async fn delete(&self, stored_path: &str) -> Result<(), ImageStoreError> {
        let absolute = self.resolve(stored_path)?;
        match fs::remove_file(&absolute).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(ImageStoreError::Io(err)),
        }
    }

    pub fn exists(&self, stored_path: &str) -> bool {
        self.resolve(stored_path)
            .map(|path| path.is_file())
            .unwrap_or(false)
    }

    pub fn url_for(stored_path: &str) -> String {
        format!("{UPLOAD_URL_PREFIX}/{stored_path}")
    }

    fn resolve(&self, stored_path: &str) -> Result<PathBuf, ImageStoreError> {
        let relative = Path::new(stored_path);
        if relative.components().count() != 1 || stored_path.starts_with('.') {
            return Err(ImageStoreError::InvalidPath);
        }
        Ok(self.root.join(relative))
    }
}

fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| ext.to_ascii_lowercase())
}
