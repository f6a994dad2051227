//! HS256 token validation.

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use socialhub_core::config::AuthConfig;
use socialhub_core::error::AppError;
use socialhub_core::types::UserId;

use super::claims::Claims;

/// Authenticates WebSocket connections using JWT tokens.
#[derive(Clone)]
pub struct WsAuthenticator {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for WsAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsAuthenticator")
            .field("validation", &self.validation)
            .finish()
    }
}

impl WsAuthenticator {
    /// Creates a new authenticator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.leeway_seconds;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Validates `token` and returns the user it was issued to.
    pub fn authenticate(&self, token: &str) -> Result<UserId, AppError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::authentication("Missing access token"));
        }

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            debug!(error = %e, "Rejected access token");
            match e.kind() {
                JwtErrorKind::ExpiredSignature => AppError::authentication("Token has expired"),
                _ => AppError::authentication("Invalid access token"),
            }
        })?;

        Ok(data.claims.user_id())
    }
}
