use chrono::Utc;
use rand::RngCore;
use rand::rngs::OsRng;
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::tokens::model::{AuthToken, TokenNamespace};
use crate::utils::errors::AppError;

pub struct TokenService;

impl TokenService {
    /// 32 bytes from the OS CSPRNG, hex-encoded: 256 bits of entropy.
    fn generate_token() -> String {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    /// Issue a fresh token for `identifier`, invalidating any prior tokens
    /// in the same namespace.
    ///
    /// Delete-prior and insert run inside one transaction so concurrent
    /// reissues for the same identifier leave at most one live token.
    #[instrument(skip(db))]
    pub async fn issue(
        db: &PgPool,
        namespace: TokenNamespace,
        identifier: &str,
    ) -> Result<AuthToken, AppError> {
        let token = Self::generate_token();
        let expires_at = Utc::now() + namespace.ttl();

        let mut tx = db.begin().await?;

        sqlx::query(&format!(
            "DELETE FROM {} WHERE identifier = $1",
            namespace.table()
        ))
        .bind(identifier)
        .execute(&mut *tx)
        .await?;

        let issued = sqlx::query_as::<_, AuthToken>(&format!(
            r#"INSERT INTO {} (token, identifier, expires_at)
               VALUES ($1, $2, $3)
               RETURNING token, identifier, expires_at"#,
            namespace.table()
        ))
        .bind(&token)
        .bind(identifier)
        .bind(expires_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(issued)
    }

    /// Redeem a token and return the email it was bound to.
    ///
    /// Lookup and deletion are a single `DELETE ... RETURNING`, so under
    /// concurrent redemption exactly one caller gets the row; every other
    /// caller fails with `TokenInvalid`. Consumption is destructive even
    /// when the token turns out to be expired, which also means expired
    /// tokens are cleaned up at lookup time rather than by a background
    /// sweep.
    ///
    /// The record is gone before the caller applies its dependent mutation.
    /// If the caller fails afterwards the user must request a fresh token.
    #[instrument(skip(db, token))]
    pub async fn consume(
        db: &PgPool,
        namespace: TokenNamespace,
        token: &str,
    ) -> Result<String, AppError> {
        let consumed = sqlx::query_as::<_, AuthToken>(&format!(
            "DELETE FROM {} WHERE token = $1 RETURNING token, identifier, expires_at",
            namespace.table()
        ))
        .bind(token)
        .fetch_optional(db)
        .await?;

        let Some(consumed) = consumed else {
            return Err(AppError::TokenInvalid);
        };

        if consumed.expires_at < Utc::now() {
            return Err(AppError::TokenExpired);
        }

        Ok(consumed.identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    async fn count_tokens(pool: &PgPool, namespace: TokenNamespace, identifier: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM {} WHERE identifier = $1",
            namespace.table()
        ))
        .bind(identifier)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn insert_expired_token(pool: &PgPool, namespace: TokenNamespace, identifier: &str) -> String {
        let token = TokenService::generate_token();
        sqlx::query(&format!(
            "INSERT INTO {} (token, identifier, expires_at) VALUES ($1, $2, $3)",
            namespace.table()
        ))
        .bind(&token)
        .bind(identifier)
        .bind(Utc::now() - Duration::minutes(5))
        .execute(pool)
        .await
        .unwrap();
        token
    }

    #[test]
    fn test_generated_tokens_are_long_and_unique() {
        let a = TokenService::generate_token();
        let b = TokenService::generate_token();

        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_issue_sets_namespace_ttl(pool: PgPool) {
        let verification =
            TokenService::issue(&pool, TokenNamespace::Verification, "ann@x.com")
                .await
                .unwrap();
        let reset = TokenService::issue(&pool, TokenNamespace::PasswordReset, "ann@x.com")
            .await
            .unwrap();

        let now = Utc::now();
        assert!(verification.expires_at > now + Duration::hours(23));
        assert!(verification.expires_at <= now + Duration::hours(24));
        assert!(reset.expires_at > now + Duration::minutes(59));
        assert!(reset.expires_at <= now + Duration::hours(1));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_reissue_invalidates_prior_token(pool: PgPool) {
        let first = TokenService::issue(&pool, TokenNamespace::Verification, "ann@x.com")
            .await
            .unwrap();
        let second = TokenService::issue(&pool, TokenNamespace::Verification, "ann@x.com")
            .await
            .unwrap();

        assert_eq!(
            count_tokens(&pool, TokenNamespace::Verification, "ann@x.com").await,
            1
        );

        let result =
            TokenService::consume(&pool, TokenNamespace::Verification, &first.token).await;
        assert!(matches!(result, Err(AppError::TokenInvalid)));

        let identifier =
            TokenService::consume(&pool, TokenNamespace::Verification, &second.token)
                .await
                .unwrap();
        assert_eq!(identifier, "ann@x.com");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_consume_is_single_use(pool: PgPool) {
        let issued = TokenService::issue(&pool, TokenNamespace::PasswordReset, "ann@x.com")
            .await
            .unwrap();

        TokenService::consume(&pool, TokenNamespace::PasswordReset, &issued.token)
            .await
            .unwrap();

        let result =
            TokenService::consume(&pool, TokenNamespace::PasswordReset, &issued.token).await;
        assert!(matches!(result, Err(AppError::TokenInvalid)));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_consume_unknown_token(pool: PgPool) {
        let result =
            TokenService::consume(&pool, TokenNamespace::Verification, "no-such-token").await;
        assert!(matches!(result, Err(AppError::TokenInvalid)));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_expired_token_fails_and_is_removed(pool: PgPool) {
        let token = insert_expired_token(&pool, TokenNamespace::Verification, "ann@x.com").await;

        let result = TokenService::consume(&pool, TokenNamespace::Verification, &token).await;
        assert!(matches!(result, Err(AppError::TokenExpired)));

        // Expired tokens are never left behind after a consumption attempt.
        assert_eq!(
            count_tokens(&pool, TokenNamespace::Verification, "ann@x.com").await,
            0
        );
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_namespaces_are_independent(pool: PgPool) {
        let verification =
            TokenService::issue(&pool, TokenNamespace::Verification, "ann@x.com")
                .await
                .unwrap();
        TokenService::issue(&pool, TokenNamespace::PasswordReset, "ann@x.com")
            .await
            .unwrap();

        // Issuing in one namespace must not invalidate the other.
        assert_eq!(
            count_tokens(&pool, TokenNamespace::Verification, "ann@x.com").await,
            1
        );

        // A verification token is meaningless in the reset namespace.
        let result =
            TokenService::consume(&pool, TokenNamespace::PasswordReset, &verification.token)
                .await;
        assert!(matches!(result, Err(AppError::TokenInvalid)));
    }
}
