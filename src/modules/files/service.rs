use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::files::model::{
    ALLOWED_MIME_TYPES, FileListResponse, FileRecord, UploadFileDto,
};
use crate::storage::{FileStorage, MAX_FILE_SIZE};
use crate::utils::errors::AppError;
use crate::utils::pagination::{PaginationMeta, PaginationParams};

pub struct FileService;

impl FileService {
    /// Strip anything that would not survive as a storage key segment.
    fn sanitize_file_name(name: &str) -> String {
        name.chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                    c
                } else {
                    '-'
                }
            })
            .collect()
    }

    /// Decode, validate, persist to storage, then record the upload.
    ///
    /// Keys are namespaced per user and prefixed with a millisecond
    /// timestamp, so two uploads of the same file name never collide.
    #[instrument(skip(db, storage, dto))]
    pub async fn upload(
        db: &PgPool,
        storage: &dyn FileStorage,
        user_id: Uuid,
        dto: UploadFileDto,
    ) -> Result<FileRecord, AppError> {
        if !ALLOWED_MIME_TYPES.contains(&dto.mime_type.as_str()) {
            return Err(AppError::validation(format!(
                "Unsupported file type: {}",
                dto.mime_type
            )));
        }

        let content = BASE64
            .decode(&dto.data)
            .map_err(|_| AppError::validation("File content is not valid base64"))?;

        if content.len() > MAX_FILE_SIZE {
            return Err(AppError::validation(format!(
                "File exceeds maximum size of {} bytes",
                MAX_FILE_SIZE
            )));
        }

        let file_name = Self::sanitize_file_name(&dto.file_name);
        let key = format!(
            "uploads/{}/{}-{}",
            user_id,
            Utc::now().timestamp_millis(),
            file_name
        );

        storage.save(&key, &content).await?;
        let url = storage.get_url(&key)?;

        let record = sqlx::query_as::<_, FileRecord>(
            r#"INSERT INTO files (key, file_name, mime_type, size, url, uploaded_by)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING *"#,
        )
        .bind(&key)
        .bind(&dto.file_name)
        .bind(&dto.mime_type)
        .bind(content.len() as i64)
        .bind(&url)
        .bind(user_id)
        .fetch_one(db)
        .await?;

        Ok(record)
    }

    /// List the caller's uploads, newest first.
    #[instrument(skip(db))]
    pub async fn list(
        db: &PgPool,
        user_id: Uuid,
        pagination: PaginationParams,
    ) -> Result<FileListResponse, AppError> {
        let limit = pagination.limit();
        let offset = pagination.offset();

        let files = sqlx::query_as::<_, FileRecord>(
            r#"SELECT * FROM files
               WHERE uploaded_by = $1
               ORDER BY created_at DESC
               LIMIT $2 OFFSET $3"#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;

        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM files WHERE uploaded_by = $1")
                .bind(user_id)
                .fetch_one(db)
                .await?;

        Ok(FileListResponse {
            files,
            meta: PaginationMeta {
                total,
                limit,
                offset,
                has_more: offset + limit < total,
            },
        })
    }

    async fn find_owned(db: &PgPool, id: Uuid, user_id: Uuid) -> Result<FileRecord, AppError> {
        let record = sqlx::query_as::<_, FileRecord>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        if record.uploaded_by != user_id {
            return Err(AppError::forbidden("You can only access your own files"));
        }

        Ok(record)
    }

    /// Remove the blob first, then the record. If the record delete fails
    /// the row points at a missing blob, which a retry cleans up since
    /// deleting an absent blob is a no-op.
    #[instrument(skip(db, storage))]
    pub async fn delete(
        db: &PgPool,
        storage: &dyn FileStorage,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<(), AppError> {
        let record = Self::find_owned(db, id, user_id).await?;

        storage.delete(&record.key).await?;

        sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        Ok(())
    }

    #[instrument(skip(db, storage))]
    pub async fn get_url(
        db: &PgPool,
        storage: &dyn FileStorage,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<String, AppError> {
        let record = Self::find_owned(db, id, user_id).await?;
        Ok(storage.get_url(&record.key)?)
    }
}
