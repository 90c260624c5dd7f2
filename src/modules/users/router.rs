use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{change_password, get_me, update_me};
use crate::state::AppState;

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me).patch(update_me))
        .route("/me/password", post(change_password))
}
