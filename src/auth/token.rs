use std::str::FromStr;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::AppError;

/// Represents the claims encoded within an access token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject of the token.
    pub sub: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
    /// Issue timestamp (seconds since epoch).
    pub iat: usize,
}

/// Issues and verifies HMAC-signed access tokens.
///
/// Built once from `AuthConfig`; the secret is never read from the environment
/// directly.
#[derive(Clone)]
pub struct TokenSigner {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expires_in: Duration,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("algorithm", &self.algorithm)
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}

impl TokenSigner {
    /// # Errors
    /// Returns `AppError::Config` when the algorithm name is unknown or is not an
    /// HMAC algorithm (the key is a shared secret), or when the expiry is not positive
    /// or too large to represent.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        let algorithm = Algorithm::from_str(&config.algorithm).map_err(|_| {
            AppError::Config(format!("Unknown signing algorithm {:?}", config.algorithm))
        })?;
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(AppError::Config(format!(
                "Signing algorithm {:?} needs a key pair, only HS256/HS384/HS512 are supported",
                config.algorithm
            )));
        }
        if config.access_token_expire_minutes <= 0 {
            return Err(AppError::Config(
                "ACCESS_TOKEN_EXPIRE_MINUTES must be positive".into(),
            ));
        }
        let expires_in = Duration::try_minutes(config.access_token_expire_minutes)
            .ok_or_else(|| AppError::Config("ACCESS_TOKEN_EXPIRE_MINUTES is out of range".into()))?;

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(config.secret_key.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret_key.as_bytes()),
            expires_in,
        })
    }

    /// Issues a token for `subject` that expires after the configured duration.
    pub fn issue(&self, subject: &str) -> Result<String, AppError> {
        self.issue_with_expiry(subject, self.expires_in)
    }

    pub fn issue_with_expiry(&self, subject: &str, expires_in: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(expires_in)
            .ok_or_else(|| AppError::InternalServerError("Token expiry out of range".into()))?;

        let claims = Claims {
            sub: subject.to_string(),
            exp: expiration.timestamp().max(0) as usize,
            iat: now.timestamp().max(0) as usize,
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Verifies the signature and expiry of `token` and returns its claims.
    ///
    /// # Errors
    /// Returns `AppError::Unauthorized` if the token is malformed, signed with another
    /// key or algorithm, or expired.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::new(self.algorithm))
            .map(|data| data.claims)
            .map_err(|e| AppError::Unauthorized(format!("Invalid token: {:?}", e.kind())))
    }
}
