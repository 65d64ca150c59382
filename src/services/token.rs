//! Signed bearer tokens (HS256 JWT).
//!
//! A token only proves that the signer issued it for a worker. Whether it is
//! still honoured is decided by the worker's issued-token list, see
//! [`crate::services::TokenAuthenticator`].

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;
use crate::domain::WorkerId;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Failed to sign token: {0}")]
    Signing(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Worker id
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    /// Makes two tokens issued in the same second distinct
    pub jti: String,
}

impl Claims {
    #[must_use]
    pub fn worker_id(&self) -> WorkerId {
        WorkerId::new(self.sub.clone())
    }
}

pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenSigner {
    #[must_use]
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    #[must_use]
    pub fn from_config(config: &SecurityConfig) -> Self {
        let hours = i64::try_from(config.token_ttl_hours).unwrap_or(i64::MAX / 3600);
        Self::new(&config.sign_key, Duration::hours(hours))
    }

    pub fn issue(&self, worker_id: &WorkerId) -> Result<String, TokenError> {
        self.issue_at(worker_id, Utc::now())
    }

    /// Issues a token as if it were signed at `issued_at`.
    pub fn issue_at(&self, worker_id: &WorkerId, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            sub: worker_id.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Checks signature and expiry and returns the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }
}
