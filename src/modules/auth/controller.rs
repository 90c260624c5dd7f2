use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use super::model::{
    CheckEmailRequest, CheckEmailResponse, ForgotPasswordRequest, LoginRequest, LoginResponse,
    LoginStatusResponse, ResendVerificationRequest, ResetPasswordRequest, SignupDto,
    VerifyEmailRequest,
};
use super::service::AuthService;
use crate::modules::users::model::UserResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Sign up with email and password
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupDto,
    responses(
        (status = 201, description = "Account created, verification email sent", body = UserResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<SignupDto>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = AuthService::signup(&state.db, &state.email, dto).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Check whether an email is already registered
#[utoipa::path(
    post,
    path = "/api/auth/check-email",
    request_body = CheckEmailRequest,
    responses(
        (status = 200, description = "Lookup result", body = CheckEmailResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn check_email(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CheckEmailRequest>,
) -> Result<Json<CheckEmailResponse>, AppError> {
    let exists = AuthService::check_email(&state.db, &dto.email).await?;
    Ok(Json(CheckEmailResponse { exists }))
}

/// Check whether an account is ready for password login
#[utoipa::path(
    post,
    path = "/api/auth/login-status",
    request_body = CheckEmailRequest,
    responses(
        (status = 200, description = "Account login status", body = LoginStatusResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn check_login_status(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CheckEmailRequest>,
) -> Result<Json<LoginStatusResponse>, AppError> {
    let status = AuthService::check_login_status(&state.db, &dto.email).await?;
    Ok(Json(status))
}

/// Login and receive a JWT access token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthService::login(&state.db, dto, &state.jwt_config).await?;
    Ok(Json(response))
}

/// Verify an email address using the emailed token
#[utoipa::path(
    post,
    path = "/api/auth/verify-email",
    request_body = VerifyEmailRequest,
    responses(
        (status = 200, description = "Email verified", body = UserResponse),
        (status = 400, description = "Invalid, expired, or already-used token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn verify_email(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<VerifyEmailRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user = AuthService::verify_email(&state.db, &state.email, &dto.token).await?;
    Ok(Json(user.into()))
}

/// Resend the verification email
#[utoipa::path(
    post,
    path = "/api/auth/resend-verification",
    request_body = ResendVerificationRequest,
    responses(
        (status = 200, description = "Verification email sent", body = MessageResponse),
        (status = 400, description = "Email is already verified", body = ErrorResponse),
        (status = 404, description = "No account with this email", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn resend_verification(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ResendVerificationRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    AuthService::resend_verification(&state.db, &state.email, &dto.email).await?;
    Ok(Json(MessageResponse {
        message: "Verification email sent. Please check your inbox.".to_string(),
    }))
}

/// Request a password reset email
#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset email sent if the account exists", body = MessageResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    AuthService::request_password_reset(&state.db, &state.email, &dto.email).await?;

    // Identical response whether or not the account exists.
    Ok(Json(MessageResponse {
        message: "If an account exists, a password reset link has been sent.".to_string(),
    }))
}

/// Reset password using the emailed token
#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = MessageResponse),
        (status = 400, description = "Invalid or expired token", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    AuthService::reset_password(&state.db, dto).await?;
    Ok(Json(MessageResponse {
        message: "Password has been reset successfully. You can now log in with your new password."
            .to_string(),
    }))
}
