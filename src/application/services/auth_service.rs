//! Authentication service for API token validation.

use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::entities::{ApiToken, AuthUser};
use crate::domain::repositories::TokenRepository;
use crate::error::AppError;
use serde_json::json;

type HmacSha256 = Hmac<Sha256>;

const TOKEN_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const TOKEN_LEN: usize = 48;

/// Service for authenticating API requests via Bearer tokens.
///
/// Tokens are hashed with HMAC-SHA256 (keyed by `signing_secret`) before storage
/// and comparison. An attacker with read-only access to the database cannot verify
/// or forge tokens without the server-side secret.
pub struct AuthService<R: TokenRepository + ?Sized = dyn TokenRepository> {
    repository: Arc<R>,
    signing_secret: String,
}

impl<R: TokenRepository + ?Sized> AuthService<R> {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `repository` - token repository for DB operations
    /// - `signing_secret` - HMAC key; must match the value used when tokens were created
    pub fn new(repository: Arc<R>, signing_secret: String) -> Self {
        Self {
            repository,
            signing_secret,
        }
    }

    /// Hashes a raw token with HMAC-SHA256 using the server signing secret.
    ///
    /// Returns a 64-character lowercase hex-encoded MAC.
    pub fn hash_token(&self, token: &str) -> String {
        // HMAC-SHA256 accepts keys of any length, so this never fails.
        let mut mac = match HmacSha256::new_from_slice(self.signing_secret.as_bytes()) {
            Ok(mac) => mac,
            Err(_) => unreachable!("HMAC accepts any key length"),
        };
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Resolves a raw bearer token to the user it was issued for.
    ///
    /// On success, updates the token's `last_used_at` (best-effort).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is unknown or revoked.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn authenticate(&self, token: &str) -> Result<AuthUser, AppError> {
        let token_hash = self.hash_token(token);

        let api_token = self
            .repository
            .find_active_by_hash(&token_hash)
            .await?
            .ok_or_else(|| {
                AppError::unauthorized(
                    "Unauthorized",
                    json!({"reason": "Invalid or revoked token"}),
                )
            })?;

        if let Err(e) = self.repository.update_last_used(&token_hash).await {
            tracing::debug!(error = %e, token_id = api_token.id, "Failed to update token last_used_at");
        }

        Ok(AuthUser {
            user_id: api_token.user_id,
        })
    }

    /// Issues a new random token for a user.
    ///
    /// Returns the stored record and the raw token. The raw value is not
    /// recoverable afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if a token with the same name exists.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn issue_token(
        &self,
        user_id: i64,
        name: &str,
    ) -> Result<(ApiToken, String), AppError> {
        let raw = generate_token();
        let token = self.register_token(user_id, name, &raw).await?;
        Ok((token, raw))
    }

    /// Stores a caller-chosen raw token for a user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if a token with the same name or value exists.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn register_token(
        &self,
        user_id: i64,
        name: &str,
        raw_token: &str,
    ) -> Result<ApiToken, AppError> {
        let token_hash = self.hash_token(raw_token);
        self.repository
            .create_token(user_id, name, &token_hash)
            .await
    }
}

/// Generates a random 48-character alphanumeric token (~286 bits of entropy).
pub fn generate_token() -> String {
    let mut rng = rand::rng();

    (0..TOKEN_LEN)
        .map(|_| {
            let idx = rng.random_range(0..TOKEN_CHARSET.len());
            TOKEN_CHARSET[idx] as char
        })
        .collect()
}
