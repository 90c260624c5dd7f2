use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::blogs::model::{
    Blog, BlogListResponse, BlogWithAuthor, CreateBlogDto, ListBlogsQuery, UpdateBlogDto,
};
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationMeta;

pub struct BlogService;

impl BlogService {
    #[instrument(skip(db, dto))]
    pub async fn create(db: &PgPool, author_id: Uuid, dto: CreateBlogDto) -> Result<Blog, AppError> {
        let blog = sqlx::query_as::<_, Blog>(
            r#"INSERT INTO blogs (title, content, excerpt, published, author_id)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING *"#,
        )
        .bind(&dto.title)
        .bind(&dto.content)
        .bind(&dto.excerpt)
        .bind(dto.published)
        .bind(author_id)
        .fetch_one(db)
        .await?;

        Ok(blog)
    }

    /// List posts newest-first with the author's name joined in.
    #[instrument(skip(db))]
    pub async fn list(db: &PgPool, query: ListBlogsQuery) -> Result<BlogListResponse, AppError> {
        let pagination = query.pagination();
        let limit = pagination.limit();
        let offset = pagination.offset();

        let blogs = sqlx::query_as::<_, BlogWithAuthor>(
            r#"SELECT b.id, b.title, b.content, b.excerpt, b.published, b.author_id,
                      u.name AS author_name, b.created_at, b.updated_at
               FROM blogs b
               JOIN users u ON u.id = b.author_id
               WHERE ($1::boolean IS NULL OR b.published = $1)
               ORDER BY b.created_at DESC
               LIMIT $2 OFFSET $3"#,
        )
        .bind(query.published)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM blogs WHERE ($1::boolean IS NULL OR published = $1)",
        )
        .bind(query.published)
        .fetch_one(db)
        .await?;

        Ok(BlogListResponse {
            blogs,
            meta: PaginationMeta {
                total,
                limit,
                offset,
                has_more: offset + limit < total,
            },
        })
    }

    #[instrument(skip(db))]
    pub async fn get_by_id(db: &PgPool, id: Uuid) -> Result<BlogWithAuthor, AppError> {
        let blog = sqlx::query_as::<_, BlogWithAuthor>(
            r#"SELECT b.id, b.title, b.content, b.excerpt, b.published, b.author_id,
                      u.name AS author_name, b.created_at, b.updated_at
               FROM blogs b
               JOIN users u ON u.id = b.author_id
               WHERE b.id = $1"#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("Blog post not found"))?;

        Ok(blog)
    }

    /// Only the author may update a post.
    #[instrument(skip(db, dto))]
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        user_id: Uuid,
        dto: UpdateBlogDto,
    ) -> Result<Blog, AppError> {
        let existing = sqlx::query_as::<_, Blog>("SELECT * FROM blogs WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found("Blog post not found"))?;

        if existing.author_id != user_id {
            return Err(AppError::forbidden("You can only update your own posts"));
        }

        let blog = sqlx::query_as::<_, Blog>(
            r#"UPDATE blogs
               SET title = COALESCE($2, title),
                   content = COALESCE($3, content),
                   excerpt = COALESCE($4, excerpt),
                   published = COALESCE($5, published),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(dto.title)
        .bind(dto.content)
        .bind(dto.excerpt)
        .bind(dto.published)
        .fetch_one(db)
        .await?;

        Ok(blog)
    }

    /// Only the author may delete a post.
    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        let existing = sqlx::query_as::<_, Blog>("SELECT * FROM blogs WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found("Blog post not found"))?;

        if existing.author_id != user_id {
            return Err(AppError::forbidden("You can only delete your own posts"));
        }

        sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        Ok(())
    }
}
