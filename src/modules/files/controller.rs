use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::files::model::{FileListResponse, FileRecord, FileUrlResponse, UploadFileDto};
use crate::modules::files::service::FileService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationParams;
use crate::validator::ValidatedJson;

/// Upload a file
#[utoipa::path(
    post,
    path = "/api/files",
    request_body = UploadFileDto,
    responses(
        (status = 201, description = "File uploaded", body = FileRecord),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 422, description = "Unsupported type, invalid content, or file too large", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Files"
)]
#[instrument(skip(state, dto))]
pub async fn upload_file(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UploadFileDto>,
) -> Result<(StatusCode, Json<FileRecord>), AppError> {
    let record =
        FileService::upload(&state.db, state.storage.as_ref(), auth_user.user_id()?, dto).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// List the current user's files
#[utoipa::path(
    get,
    path = "/api/files",
    params(
        ("limit" = Option<i64>, Query, description = "Page size, 1 to 100"),
        ("offset" = Option<i64>, Query, description = "Rows to skip")
    ),
    responses(
        (status = 200, description = "Paginated file records, newest first", body = FileListResponse),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Files"
)]
#[instrument(skip(state))]
pub async fn list_files(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<FileListResponse>, AppError> {
    let response = FileService::list(&state.db, auth_user.user_id()?, pagination).await?;
    Ok(Json(response))
}

/// Get a download URL for a file
#[utoipa::path(
    get,
    path = "/api/files/{id}/url",
    params(
        ("id" = Uuid, Path, description = "File id")
    ),
    responses(
        (status = 200, description = "Public URL for the file", body = FileUrlResponse),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not the owner of this file", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Files"
)]
#[instrument(skip(state))]
pub async fn get_file_url(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<FileUrlResponse>, AppError> {
    let url =
        FileService::get_url(&state.db, state.storage.as_ref(), id, auth_user.user_id()?).await?;
    Ok(Json(FileUrlResponse { url }))
}

/// Delete a file
#[utoipa::path(
    delete,
    path = "/api/files/{id}",
    params(
        ("id" = Uuid, Path, description = "File id")
    ),
    responses(
        (status = 204, description = "File deleted"),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not the owner of this file", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Files"
)]
#[instrument(skip(state))]
pub async fn delete_file(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    FileService::delete(&state.db, state.storage.as_ref(), id, auth_user.user_id()?).await?;
    Ok(StatusCode::NO_CONTENT)
}
