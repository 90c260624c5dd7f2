use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::utils::pagination::{PaginationMeta, PaginationParams};

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub published: bool,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Blog row joined with its author's display name, for listings.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct BlogWithAuthor {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub published: bool,
    pub author_id: Uuid,
    pub author_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBlogDto {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,

    pub excerpt: Option<String>,

    #[serde(default)]
    pub published: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBlogDto {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,

    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: Option<String>,

    pub excerpt: Option<String>,

    pub published: Option<bool>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListBlogsQuery {
    /// Filter by publication state. Omit to list everything.
    pub published: Option<bool>,

    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListBlogsQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            limit: self.limit,
            offset: self.offset,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BlogListResponse {
    pub blogs: Vec<BlogWithAuthor>,
    pub meta: PaginationMeta,
}
