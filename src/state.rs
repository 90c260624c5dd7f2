use std::sync::Arc;

use sqlx::PgPool;

use crate::config::cors::CorsConfig;
use crate::config::database::init_db_pool;
use crate::config::email::EmailConfig;
use crate::config::jwt::JwtConfig;
use crate::config::storage::StorageConfig;
use crate::storage::{FileStorage, LocalFileStorage};
use crate::utils::email::EmailService;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub email: EmailService,
    pub storage: Arc<dyn FileStorage>,
}

pub async fn init_app_state() -> AppState {
    AppState {
        db: init_db_pool().await,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        email: EmailService::new(EmailConfig::from_env()),
        storage: Arc::new(LocalFileStorage::from_config(&StorageConfig::from_env())),
    }
}
