use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use tracing::error;

/// Application error taxonomy.
///
/// Every failure surfaced to a caller carries a stable machine-readable
/// `code` alongside a human-readable message. Store-level failures
/// (connection errors, constraint violations we did not anticipate) collapse
/// into [`AppError::Internal`] and are never part of the public taxonomy.
#[derive(Debug)]
pub enum AppError {
    /// Resource already exists (duplicate signup).
    Conflict(String),
    /// Operate-on-missing-resource.
    NotFound(String),
    /// Token is unknown or already consumed.
    TokenInvalid,
    /// Token exists but its expiry has passed.
    TokenExpired,
    /// Email is already verified; nothing to resend.
    AlreadyVerified,
    /// Uniform login failure. Deliberately indistinguishable across unknown
    /// email, OAuth-only account, unverified account, and wrong password.
    InvalidCredentials,
    /// Missing or invalid bearer token.
    Unauthorized(String),
    /// Authenticated but not allowed to touch this resource.
    Forbidden(String),
    /// Request rejected before any store mutation.
    Validation(String),
    /// Opaque infrastructure failure.
    Internal(Error),
}

impl AppError {
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::Internal(err.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::TokenInvalid | Self::TokenExpired | Self::AlreadyVerified => {
                StatusCode::BAD_REQUEST
            }
            Self::InvalidCredentials | Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-distinguishable error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Conflict(_) => "conflict",
            Self::NotFound(_) => "not_found",
            Self::TokenInvalid => "token_invalid",
            Self::TokenExpired => "token_expired",
            Self::AlreadyVerified => "already_verified",
            Self::InvalidCredentials => "invalid_credentials",
            Self::Unauthorized(_) => "unauthorized",
            Self::Forbidden(_) => "forbidden",
            Self::Validation(_) => "validation",
            Self::Internal(_) => "internal",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Conflict(msg)
            | Self::NotFound(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::Validation(msg) => msg.clone(),
            Self::TokenInvalid => "Invalid token".to_string(),
            Self::TokenExpired => "Token expired".to_string(),
            Self::AlreadyVerified => "Email is already verified".to_string(),
            Self::InvalidCredentials => "Invalid email or password".to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Internal(err) => write!(f, "{}", err),
            other => write!(f, "{}", other.message()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::Internal(err) = &self {
            error!(error = %err, "Internal server error");
        }

        let body = Json(json!({
            "error": self.message(),
            "code": self.code(),
        }));

        (self.status(), body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::conflict("dup").status(), StatusCode::CONFLICT);
        assert_eq!(AppError::TokenInvalid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::TokenExpired.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::InvalidCredentials.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::validation("bad").status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            AppError::conflict("a"),
            AppError::not_found("b"),
            AppError::TokenInvalid,
            AppError::TokenExpired,
            AppError::AlreadyVerified,
            AppError::InvalidCredentials,
            AppError::unauthorized("c"),
            AppError::forbidden("d"),
            AppError::validation("e"),
            AppError::internal(anyhow::anyhow!("f")),
        ];
        let mut codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_invalid_credentials_message_is_generic() {
        // The login boundary must never leak which check failed.
        assert_eq!(
            AppError::InvalidCredentials.message(),
            "Invalid email or password"
        );
    }

    #[test]
    fn test_sqlx_error_maps_to_internal() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.code(), "internal");
    }
}
