use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{create_blog, delete_blog, get_blog, list_blogs, update_blog};
use crate::state::AppState;

pub fn init_blogs_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_blog).get(list_blogs))
        .route(
            "/{id}",
            get(get_blog).patch(update_blog).delete(delete_blog),
        )
}
