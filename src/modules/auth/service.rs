use sqlx::PgPool;
use tracing::{instrument, warn};

use crate::config::jwt::JwtConfig;
use crate::modules::tokens::model::TokenNamespace;
use crate::modules::tokens::service::TokenService;
use crate::modules::users::model::User;
use crate::modules::users::service::UserService;
use crate::utils::email::EmailService;
use crate::utils::errors::AppError;
use crate::utils::jwt::create_access_token;
use crate::utils::password::{hash_password, verify_password};

use super::model::{
    LoginRequest, LoginResponse, LoginStatusResponse, ResetPasswordRequest, SignupDto,
};

pub struct AuthService;

impl AuthService {
    /// Create an account and kick off email verification.
    ///
    /// The verification email is best-effort: a send failure is logged but
    /// does not roll back the signup, since the user can always ask for a
    /// resend.
    #[instrument(skip(db, email_service, dto))]
    pub async fn signup(
        db: &PgPool,
        email_service: &EmailService,
        dto: SignupDto,
    ) -> Result<User, AppError> {
        if UserService::find_by_email(db, &dto.email).await?.is_some() {
            return Err(AppError::conflict("An account with this email already exists"));
        }

        let hashed_password = hash_password(&dto.password)?;

        let user = Self::insert_user(db, &dto.name, &dto.email, &hashed_password).await?;

        let token = TokenService::issue(db, TokenNamespace::Verification, &user.email).await?;

        if let Err(e) = email_service
            .send_verification_email(&user.email, user.name.as_deref().unwrap_or("there"), &token.token)
            .await
        {
            warn!(error = %e, email = %user.email, "Failed to send verification email");
        }

        Ok(user)
    }

    /// The email uniqueness check above races with concurrent signups, so
    /// the constraint violation still maps to a conflict rather than an
    /// internal error.
    async fn insert_user(
        db: &PgPool,
        name: &str,
        email: &str,
        hashed_password: &str,
    ) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"INSERT INTO users (name, email, password)
               VALUES ($1, $2, $3)
               RETURNING *"#,
        )
        .bind(name)
        .bind(email)
        .bind(hashed_password)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::conflict("An account with this email already exists");
            }
            AppError::from(e)
        })
    }

    #[instrument(skip(db))]
    pub async fn check_email(db: &PgPool, email: &str) -> Result<bool, AppError> {
        Ok(UserService::find_by_email(db, email).await?.is_some())
    }

    /// Tell the sign-in form what to expect before the password is sent.
    ///
    /// This endpoint deliberately reveals account state for a given email.
    /// The login endpoint itself stays uniform; this probe exists so the
    /// frontend can route users to signup, social login, or a verification
    /// reminder instead of a dead-end password prompt.
    #[instrument(skip(db))]
    pub async fn check_login_status(
        db: &PgPool,
        email: &str,
    ) -> Result<LoginStatusResponse, AppError> {
        let Some(user) = UserService::find_by_email(db, email).await? else {
            return Ok(LoginStatusResponse::NO_ACCOUNT);
        };

        if user.is_oauth_only() {
            return Ok(LoginStatusResponse::OAUTH_ONLY);
        }

        if user.email_verified_at.is_none() {
            return Ok(LoginStatusResponse::UNVERIFIED);
        }

        Ok(LoginStatusResponse::OK)
    }

    /// Verify credentials and mint an access token.
    ///
    /// Every failure mode returns the same `InvalidCredentials` error:
    /// unknown email, OAuth-only account, wrong password, and unverified
    /// email are indistinguishable to the caller.
    #[instrument(skip(db, dto))]
    pub async fn login(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let user = UserService::find_by_email(db, &dto.email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let Some(password_hash) = &user.password else {
            return Err(AppError::InvalidCredentials);
        };

        if !verify_password(&dto.password, password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        if user.email_verified_at.is_none() {
            return Err(AppError::InvalidCredentials);
        }

        let access_token = create_access_token(user.id, &user.email, jwt_config)?;

        Ok(LoginResponse {
            access_token,
            user: user.into(),
        })
    }

    /// Redeem a verification token and mark the account verified.
    ///
    /// The token is consumed before the account mutation, so a token that
    /// reaches this point can never be redeemed twice even if the mutation
    /// fails. The welcome email goes out at most once per account, guarded
    /// by the `welcome_email_sent` flag.
    #[instrument(skip(db, email_service, token))]
    pub async fn verify_email(
        db: &PgPool,
        email_service: &EmailService,
        token: &str,
    ) -> Result<User, AppError> {
        let email = TokenService::consume(db, TokenNamespace::Verification, token).await?;

        let user = UserService::find_by_email(db, &email)
            .await?
            .ok_or(AppError::TokenInvalid)?;

        if user.email_verified_at.is_some() {
            return Err(AppError::AlreadyVerified);
        }

        let user = sqlx::query_as::<_, User>(
            r#"UPDATE users
               SET email_verified_at = NOW(), updated_at = NOW()
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(user.id)
        .fetch_one(db)
        .await?;

        if !user.welcome_email_sent {
            match email_service
                .send_welcome_email(&user.email, user.name.as_deref().unwrap_or("there"))
                .await
            {
                Ok(()) => {
                    sqlx::query("UPDATE users SET welcome_email_sent = TRUE WHERE id = $1")
                        .bind(user.id)
                        .execute(db)
                        .await?;
                }
                Err(e) => {
                    // Flag stays unset so a retry path can still send it.
                    warn!(error = %e, email = %user.email, "Failed to send welcome email");
                }
            }
        }

        UserService::get_profile(db, user.id).await
    }

    #[instrument(skip(db, email_service))]
    pub async fn resend_verification(
        db: &PgPool,
        email_service: &EmailService,
        email: &str,
    ) -> Result<(), AppError> {
        let user = UserService::find_by_email(db, email)
            .await?
            .ok_or_else(|| AppError::not_found("No account found with this email"))?;

        if user.email_verified_at.is_some() {
            return Err(AppError::AlreadyVerified);
        }

        let token = TokenService::issue(db, TokenNamespace::Verification, &user.email).await?;

        email_service
            .send_verification_email(&user.email, user.name.as_deref().unwrap_or("there"), &token.token)
            .await?;

        Ok(())
    }

    /// Issue a password reset token for any existing account.
    ///
    /// Returns `Ok(())` whether or not the account exists; the caller must
    /// respond identically in both cases so this endpoint cannot be used
    /// to probe for registered emails. Even a failed email send is
    /// swallowed here, because surfacing it would break the uniform
    /// response. Accounts created through a social provider get a token
    /// too; completing the reset gives them a local password.
    #[instrument(skip(db, email_service))]
    pub async fn request_password_reset(
        db: &PgPool,
        email_service: &EmailService,
        email: &str,
    ) -> Result<(), AppError> {
        let Some(user) = UserService::find_by_email(db, email).await? else {
            return Ok(());
        };

        let token = TokenService::issue(db, TokenNamespace::PasswordReset, &user.email).await?;

        if let Err(e) = email_service
            .send_password_reset_email(&user.email, user.name.as_deref().unwrap_or("there"), &token.token)
            .await
        {
            warn!(error = %e, email = %user.email, "Failed to send password reset email");
        }

        Ok(())
    }

    /// Redeem a reset token and set the new password.
    #[instrument(skip(db, dto))]
    pub async fn reset_password(db: &PgPool, dto: ResetPasswordRequest) -> Result<(), AppError> {
        let email = TokenService::consume(db, TokenNamespace::PasswordReset, &dto.token).await?;

        let user = UserService::find_by_email(db, &email)
            .await?
            .ok_or(AppError::TokenInvalid)?;

        let hashed_password = hash_password(&dto.password)?;

        sqlx::query("UPDATE users SET password = $2, updated_at = NOW() WHERE id = $1")
            .bind(user.id)
            .bind(&hashed_password)
            .execute(db)
            .await?;

        Ok(())
    }
}
