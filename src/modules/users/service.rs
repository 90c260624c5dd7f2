use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::users::model::{ChangePasswordDto, UpdateProfileDto, User};
use crate::utils::errors::AppError;
use crate::utils::password::{hash_password, verify_password};

pub struct UserService;

impl UserService {
    #[instrument(skip(db))]
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await?;

        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(db)
            .await?;

        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn get_profile(db: &PgPool, id: Uuid) -> Result<User, AppError> {
        Self::find_by_id(db, id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        dto: UpdateProfileDto,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"UPDATE users
               SET name = COALESCE($2, name),
                   image = COALESCE($3, image),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(dto.name)
        .bind(dto.image)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

        Ok(user)
    }

    #[instrument(skip(db, dto))]
    pub async fn change_password(
        db: &PgPool,
        id: Uuid,
        dto: ChangePasswordDto,
    ) -> Result<(), AppError> {
        let user = Self::get_profile(db, id).await?;

        let Some(current_hash) = &user.password else {
            return Err(AppError::validation(
                "This account uses social login and has no password to change",
            ));
        };

        if !verify_password(&dto.current_password, current_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        let new_hash = hash_password(&dto.new_password)?;

        sqlx::query("UPDATE users SET password = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(new_hash)
            .execute(db)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::password::hash_password;

    async fn seed_user(pool: &PgPool, email: &str, password: Option<&str>) -> User {
        let hash = password.map(|p| hash_password(p).unwrap());
        sqlx::query_as::<_, User>(
            r#"INSERT INTO users (name, email, password, email_verified_at)
               VALUES ($1, $2, $3, NOW())
               RETURNING *"#,
        )
        .bind("Test User")
        .bind(email)
        .bind(hash)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_profile_keeps_unset_fields(pool: PgPool) {
        let user = seed_user(&pool, "ann@x.com", Some("password123")).await;

        let updated = UserService::update_profile(
            &pool,
            user.id,
            UpdateProfileDto {
                name: Some("Ann Updated".to_string()),
                image: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.name.as_deref(), Some("Ann Updated"));
        assert_eq!(updated.email, "ann@x.com");
        assert!(updated.updated_at >= user.updated_at);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_change_password_verifies_current(pool: PgPool) {
        let user = seed_user(&pool, "ann@x.com", Some("password123")).await;

        let result = UserService::change_password(
            &pool,
            user.id,
            ChangePasswordDto {
                current_password: "wrong-password".to_string(),
                new_password: "newpassword123".to_string(),
            },
        )
        .await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));

        UserService::change_password(
            &pool,
            user.id,
            ChangePasswordDto {
                current_password: "password123".to_string(),
                new_password: "newpassword123".to_string(),
            },
        )
        .await
        .unwrap();

        let reloaded = UserService::get_profile(&pool, user.id).await.unwrap();
        assert!(verify_password("newpassword123", reloaded.password.as_deref().unwrap()).unwrap());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_change_password_rejects_oauth_only_account(pool: PgPool) {
        let user = seed_user(&pool, "oauth@x.com", None).await;

        let result = UserService::change_password(
            &pool,
            user.id,
            ChangePasswordDto {
                current_password: "anything".to_string(),
                new_password: "newpassword123".to_string(),
            },
        )
        .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
