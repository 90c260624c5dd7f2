use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::blogs::model::{
    Blog, BlogListResponse, BlogWithAuthor, CreateBlogDto, ListBlogsQuery, UpdateBlogDto,
};
use crate::modules::blogs::service::BlogService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Create a blog post
#[utoipa::path(
    post,
    path = "/api/blogs",
    request_body = CreateBlogDto,
    responses(
        (status = 201, description = "Blog post created", body = Blog),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Blogs"
)]
#[instrument(skip(state, dto))]
pub async fn create_blog(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateBlogDto>,
) -> Result<(StatusCode, Json<Blog>), AppError> {
    let blog = BlogService::create(&state.db, auth_user.user_id()?, dto).await?;
    Ok((StatusCode::CREATED, Json(blog)))
}

/// List blog posts
#[utoipa::path(
    get,
    path = "/api/blogs",
    params(ListBlogsQuery),
    responses(
        (status = 200, description = "Paginated blog posts, newest first", body = BlogListResponse)
    ),
    tag = "Blogs"
)]
#[instrument(skip(state))]
pub async fn list_blogs(
    State(state): State<AppState>,
    Query(query): Query<ListBlogsQuery>,
) -> Result<Json<BlogListResponse>, AppError> {
    let response = BlogService::list(&state.db, query).await?;
    Ok(Json(response))
}

/// Get a blog post by id
#[utoipa::path(
    get,
    path = "/api/blogs/{id}",
    params(
        ("id" = Uuid, Path, description = "Blog post id")
    ),
    responses(
        (status = 200, description = "Blog post", body = BlogWithAuthor),
        (status = 404, description = "Blog post not found", body = ErrorResponse)
    ),
    tag = "Blogs"
)]
#[instrument(skip(state))]
pub async fn get_blog(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BlogWithAuthor>, AppError> {
    let blog = BlogService::get_by_id(&state.db, id).await?;
    Ok(Json(blog))
}

/// Update a blog post (author only)
#[utoipa::path(
    patch,
    path = "/api/blogs/{id}",
    params(
        ("id" = Uuid, Path, description = "Blog post id")
    ),
    request_body = UpdateBlogDto,
    responses(
        (status = 200, description = "Updated blog post", body = Blog),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not the author of this post", body = ErrorResponse),
        (status = 404, description = "Blog post not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Blogs"
)]
#[instrument(skip(state, dto))]
pub async fn update_blog(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateBlogDto>,
) -> Result<Json<Blog>, AppError> {
    let blog = BlogService::update(&state.db, id, auth_user.user_id()?, dto).await?;
    Ok(Json(blog))
}

/// Delete a blog post (author only)
#[utoipa::path(
    delete,
    path = "/api/blogs/{id}",
    params(
        ("id" = Uuid, Path, description = "Blog post id")
    ),
    responses(
        (status = 204, description = "Blog post deleted"),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not the author of this post", body = ErrorResponse),
        (status = 404, description = "Blog post not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Blogs"
)]
#[instrument(skip(state))]
pub async fn delete_blog(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    BlogService::delete(&state.db, id, auth_user.user_id()?).await?;
    Ok(StatusCode::NO_CONTENT)
}
