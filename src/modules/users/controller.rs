use axum::{Json, extract::State};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::{ErrorResponse, MessageResponse};
use crate::modules::users::model::{ChangePasswordDto, UpdateProfileDto, UserResponse};
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Get the current user's profile
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Current user profile", body = UserResponse),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = UserService::get_profile(&state.db, auth_user.user_id()?).await?;
    Ok(Json(user.into()))
}

/// Update the current user's profile
#[utoipa::path(
    patch,
    path = "/api/users/me",
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Updated profile", body = UserResponse),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn update_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateProfileDto>,
) -> Result<Json<UserResponse>, AppError> {
    let user = UserService::update_profile(&state.db, auth_user.user_id()?, dto).await?;
    Ok(Json(user.into()))
}

/// Change the current user's password
#[utoipa::path(
    post,
    path = "/api/users/me/password",
    request_body = ChangePasswordDto,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Current password is incorrect", body = ErrorResponse),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<ChangePasswordDto>,
) -> Result<Json<MessageResponse>, AppError> {
    UserService::change_password(&state.db, auth_user.user_id()?, dto).await?;
    Ok(Json(MessageResponse {
        message: "Password changed successfully".to_string(),
    }))
}
