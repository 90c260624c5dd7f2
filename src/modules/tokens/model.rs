use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;

/// Logical partition for single-use tokens.
///
/// Both namespaces share the same mechanism but live in separate tables,
/// so a token issued in one can never be redeemed in the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenNamespace {
    Verification,
    PasswordReset,
}

impl TokenNamespace {
    pub fn table(&self) -> &'static str {
        match self {
            Self::Verification => "verification_tokens",
            Self::PasswordReset => "password_reset_tokens",
        }
    }

    pub fn ttl(&self) -> Duration {
        match self {
            Self::Verification => Duration::hours(24),
            Self::PasswordReset => Duration::hours(1),
        }
    }
}

/// A single-use token bound to an email address.
#[derive(Debug, Clone, FromRow)]
pub struct AuthToken {
    pub token: String,
    pub identifier: String,
    pub expires_at: DateTime<Utc>,
}
