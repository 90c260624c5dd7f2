use axum::{
    Router,
    routing::{delete, get},
};

use super::controller::{delete_file, get_file_url, list_files, upload_file};
use crate::state::AppState;

pub fn init_files_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_files).post(upload_file))
        .route("/{id}", delete(delete_file))
        .route("/{id}/url", get(get_file_url))
}
