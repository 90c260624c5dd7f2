use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::modules::users::model::UserResponse;

/// JWT claims embedded in every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id as a string.
    pub sub: String,
    pub email: String,
    /// Expiry, seconds since epoch.
    pub exp: usize,
    /// Issued-at, seconds since epoch.
    pub iat: usize,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupDto {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: UserResponse,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CheckEmailRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckEmailResponse {
    pub exists: bool,
}

/// Pre-login account probe, consumed by the sign-in form before the
/// password is ever submitted.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginStatusResponse {
    /// One of `ok`, `no_account`, `oauth_only`, `unverified`.
    pub status: &'static str,
    pub message: &'static str,
}

impl LoginStatusResponse {
    pub const OK: Self = Self {
        status: "ok",
        message: "Account ready for login",
    };

    pub const NO_ACCOUNT: Self = Self {
        status: "no_account",
        message: "No account found with this email. Please sign up first.",
    };

    pub const OAUTH_ONLY: Self = Self {
        status: "oauth_only",
        message: "This account uses social login. Please sign in with your social provider.",
    };

    pub const UNVERIFIED: Self = Self {
        status: "unverified",
        message: "Please verify your email before signing in. Check your inbox for the verification link.",
    };
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyEmailRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResendVerificationRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}
