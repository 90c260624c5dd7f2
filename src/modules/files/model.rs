use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::utils::pagination::PaginationMeta;

/// Content types accepted for upload.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
    "text/csv",
];

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct FileRecord {
    pub id: Uuid,
    pub key: String,
    pub file_name: String,
    pub mime_type: String,
    pub size: i64,
    pub url: Option<String>,
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UploadFileDto {
    #[validate(length(min = 1, message = "File name is required"))]
    pub file_name: String,

    #[validate(length(min = 1, message = "Content type is required"))]
    pub mime_type: String,

    /// Base64-encoded file content.
    #[validate(length(min = 1, message = "File content is required"))]
    pub data: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FileListResponse {
    pub files: Vec<FileRecord>,
    pub meta: PaginationMeta,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FileUrlResponse {
    pub url: String,
}
