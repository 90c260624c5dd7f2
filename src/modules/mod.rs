pub mod auth;
pub mod blogs;
pub mod files;
pub mod tokens;
pub mod users;
