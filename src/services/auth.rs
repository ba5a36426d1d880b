use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::services::blacklist::{BlacklistError, TokenBlacklist};

/// Errors that can occur while checking bearer tokens
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Token has been revoked")]
    Revoked,

    #[error("Blacklist error: {0}")]
    Blacklist(#[from] BlacklistError),
}

/// Claims carried by access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: Option<String>,
    pub exp: i64,
}

/// Verifies HS256 access tokens against an injected revocation store
///
/// Token issuance lives in the auth service; this side only validates and
/// revokes.
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    blacklist: Arc<dyn TokenBlacklist>,
}

impl TokenVerifier {
    pub fn new(secret: &[u8], blacklist: Arc<dyn TokenBlacklist>) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
            blacklist,
        }
    }

    /// Extract the token from an `Authorization: Bearer <token>` header value
    pub fn bearer(header: Option<&str>) -> Result<&str, AuthError> {
        header
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingToken)
    }

    /// Validate signature and expiry, then consult the blacklist
    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;

        if self.blacklist.is_revoked(token).await? {
            return Err(AuthError::Revoked);
        }

        Ok(data.claims)
    }

    /// Revoke a valid token for the rest of its lifetime
    pub async fn revoke(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = self.verify(token).await?;

        let remaining = (claims.exp - chrono::Utc::now().timestamp()).max(1) as u64;
        self.blacklist
            .revoke(token, Duration::from_secs(remaining))
            .await?;

        tracing::info!("Revoked token for subject {:?}", claims.sub);
        Ok(claims)
    }
}
