use axum::{Router, routing::post};

use super::controller::{
    check_email, check_login_status, forgot_password, login, resend_verification, reset_password,
    signup, verify_email,
};
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/check-email", post(check_email))
        .route("/login-status", post(check_login_status))
        .route("/login", post(login))
        .route("/verify-email", post(verify_email))
        .route("/resend-verification", post(resend_verification))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
}
