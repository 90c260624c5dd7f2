//! Shared utilities.
//!
//! - [`email`]: Transactional email sending over SMTP
//! - [`errors`]: Application error taxonomy and response mapping
//! - [`jwt`]: JWT access token creation and verification
//! - [`pagination`]: Request pagination helpers
//! - [`password`]: Password hashing and verification

pub mod email;
pub mod errors;
pub mod jwt;
pub mod pagination;
pub mod password;
