use std::env;
use std::path::PathBuf;

/// File storage backend selection, resolved once at startup.
///
/// Only the local backend ships with this template; anything else (S3,
/// MinIO, ...) plugs in behind [`crate::storage::FileStorage`] without
/// touching business logic.
#[derive(Clone, Debug)]
pub enum StorageConfig {
    Local {
        upload_dir: PathBuf,
        base_url: String,
    },
}

impl StorageConfig {
    pub fn from_env() -> Self {
        // "local" is the only provider shipped; unknown values fall back to it.
        Self::Local {
            upload_dir: PathBuf::from(
                env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string()),
            ),
            base_url: env::var("UPLOAD_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000/files".to_string()),
        }
    }
}
