use std::sync::Arc;

use saasbase::config::cors::CorsConfig;
use saasbase::config::email::EmailConfig;
use saasbase::config::jwt::JwtConfig;
use saasbase::router::init_router;
use saasbase::state::AppState;
use saasbase::storage::LocalFileStorage;
use saasbase::utils::email::EmailService;
use saasbase::utils::jwt::create_access_token;
use saasbase::utils::password::hash_password;
use sqlx::PgPool;
use uuid::Uuid;

#[allow(dead_code)]
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub password: String,
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret".to_string(),
        access_token_expiry: 3600,
    }
}

fn disabled_email_service() -> EmailService {
    EmailService::new(EmailConfig {
        enabled: false,
        smtp_host: "localhost".to_string(),
        smtp_port: 1025,
        smtp_username: String::new(),
        smtp_password: String::new(),
        from_email: "noreply@saasbase.dev".to_string(),
        from_name: "Saasbase".to_string(),
        frontend_url: "http://localhost:3000".to_string(),
    })
}

pub async fn setup_test_app(pool: PgPool) -> axum::Router {
    let upload_dir = std::env::temp_dir().join(format!("saasbase-it-{}", Uuid::new_v4()));
    let state = AppState {
        db: pool,
        jwt_config: test_jwt_config(),
        cors_config: CorsConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
        email: disabled_email_service(),
        storage: Arc::new(LocalFileStorage::new(
            upload_dir,
            "http://localhost:3000/files".to_string(),
        )),
    };
    init_router(state)
}

/// Insert a user directly, bypassing the signup endpoint.
pub async fn create_test_user(
    pool: &PgPool,
    email: &str,
    password: &str,
    verified: bool,
) -> TestUser {
    let hashed = hash_password(password).unwrap();

    let id = sqlx::query_scalar::<_, Uuid>(
        r#"INSERT INTO users (name, email, password, email_verified_at)
           VALUES ($1, $2, $3, CASE WHEN $4 THEN NOW() END)
           RETURNING id"#,
    )
    .bind("Test User")
    .bind(email)
    .bind(&hashed)
    .bind(verified)
    .fetch_one(pool)
    .await
    .unwrap();

    TestUser {
        id,
        email: email.to_string(),
        password: password.to_string(),
    }
}

/// Mint a bearer token the way the login endpoint would.
#[allow(dead_code)]
pub fn auth_token_for(user: &TestUser) -> String {
    create_access_token(user.id, &user.email, &test_jwt_config()).unwrap()
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

/// Fetch the latest single-use token issued for an email.
#[allow(dead_code)]
pub async fn stored_token(pool: &PgPool, table: &str, email: &str) -> String {
    sqlx::query_scalar::<_, String>(&format!(
        "SELECT token FROM {} WHERE identifier = $1",
        table
    ))
    .bind(email)
    .fetch_one(pool)
    .await
    .unwrap()
}
