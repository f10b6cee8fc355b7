//! Authentication ports.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Claims carried by a session token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: Uuid,
    /// Unique per issued token, used for revocation.
    pub token_id: Uuid,
    pub issued_at: i64,
    pub exp: i64,
}

impl TokenClaims {
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

/// Token service trait for issuing and verifying bearer tokens.
pub trait TokenService: Send + Sync {
    /// Generate an access token for a user.
    fn generate_token(&self, user_id: Uuid) -> Result<String, AuthError>;

    /// Validate and decode a token. Does not consult revocations.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Validity window of issued tokens.
    fn expiration_seconds(&self) -> i64;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Tokens invalidated before their natural expiry (logout).
///
/// Entries only need to outlive the token they revoke; implementations may
/// forget them after `expires_at`.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    async fn revoke(&self, token_id: Uuid, expires_at: DateTime<Utc>) -> Result<(), AuthError>;

    async fn is_revoked(&self, token_id: Uuid) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token has been revoked")]
    TokenRevoked,

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Hashing error: {0}")]
    HashingError(String),

    #[error("Revocation store error: {0}")]
    Store(String),
}
