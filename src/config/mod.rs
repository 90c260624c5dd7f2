//! Configuration modules.
//!
//! Each submodule owns one concern and is loaded from environment variables
//! exactly once at process start; the resulting structs are passed down
//! through [`crate::state::AppState`]. Nothing in the application reads the
//! environment after startup.
//!
//! - [`cors`]: Allowed origins for the CORS layer
//! - [`database`]: PostgreSQL connection pool initialization
//! - [`email`]: SMTP transport and sender identity
//! - [`jwt`]: Access token secret and expiry
//! - [`storage`]: File storage backend selection

pub mod cors;
pub mod database;
pub mod email;
pub mod jwt;
pub mod storage;
