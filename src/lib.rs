//! SaaS starter backend: JWT authentication with email verification,
//! password reset, blog posts, and file uploads on axum and PostgreSQL.

pub mod config;
pub mod docs;
pub mod logging;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod storage;
pub mod utils;
pub mod validator;
