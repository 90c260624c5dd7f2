//! File storage abstraction.
//!
//! The rest of the application treats file storage as an external blob
//! store with three capabilities: save, delete, and resolve a public URL.
//! [`LocalFileStorage`] is the backend that ships with the template; S3 or
//! any other provider can be swapped in behind the same trait.

use std::fmt;
use std::path::PathBuf;
use tokio::fs;

use crate::config::storage::StorageConfig;

/// Maximum accepted upload size: 10 MB.
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Abstract trait for file storage backends.
pub trait FileStorage: Send + Sync {
    /// Save file content under `key` and return the storage key.
    fn save<'a>(
        &'a self,
        key: &'a str,
        content: &'a [u8],
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<String, StorageError>> + Send + 'a>>;

    /// Delete a file by key. Deleting a missing file is not an error.
    fn delete<'a>(
        &'a self,
        key: &'a str,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<(), StorageError>> + Send + 'a>>;

    /// Resolve the public URL for a stored file.
    fn get_url(&self, key: &str) -> Result<String, StorageError>;
}

/// Error type for file storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// File exceeds the maximum allowed size.
    InvalidFileSize { max_bytes: usize },

    /// I/O error from the backing store.
    IoError(std::io::Error),

    /// Invalid storage key format.
    InvalidKey(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFileSize { max_bytes } => {
                write!(f, "File exceeds maximum size of {} bytes", max_bytes)
            }
            Self::IoError(e) => write!(f, "I/O error: {}", e),
            Self::InvalidKey(msg) => write!(f, "Invalid storage key: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e)
    }
}

/// Local filesystem storage backend.
///
/// Stores files under a base directory and serves them through a static
/// file URL prefix. This is the development default; production setups
/// plug an object store in behind [`FileStorage`].
#[derive(Clone)]
pub struct LocalFileStorage {
    base_dir: PathBuf,
    base_url: String,
    max_file_size: usize,
}

impl LocalFileStorage {
    pub fn new(base_dir: PathBuf, base_url: String) -> Self {
        Self {
            base_dir,
            base_url,
            max_file_size: MAX_FILE_SIZE,
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        match config {
            StorageConfig::Local {
                upload_dir,
                base_url,
            } => Self::new(upload_dir.clone(), base_url.clone()),
        }
    }

    /// Keys must stay inside the base directory.
    fn validate_key(key: &str) -> Result<(), StorageError> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Key must not be empty, contain '..', or start with '/'".to_string(),
            ));
        }

        if !key
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '/' || c == '.')
        {
            return Err(StorageError::InvalidKey(
                "Key contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }
}

impl FileStorage for LocalFileStorage {
    fn save<'a>(
        &'a self,
        key: &'a str,
        content: &'a [u8],
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<String, StorageError>> + Send + 'a>>
    {
        Box::pin(async move {
            Self::validate_key(key)?;

            if content.len() > self.max_file_size {
                return Err(StorageError::InvalidFileSize {
                    max_bytes: self.max_file_size,
                });
            }

            let file_path = self.base_dir.join(key);

            if let Some(parent) = file_path.parent() {
                fs::create_dir_all(parent).await?;
            }

            fs::write(&file_path, content).await?;

            Ok(key.to_string())
        })
    }

    fn delete<'a>(
        &'a self,
        key: &'a str,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<(), StorageError>> + Send + 'a>>
    {
        Box::pin(async move {
            Self::validate_key(key)?;

            let file_path = self.base_dir.join(key);

            match fs::remove_file(&file_path).await {
                Ok(_) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn get_url(&self, key: &str) -> Result<String, StorageError> {
        Self::validate_key(key)?;

        Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), key))
    }
}
