//! Bearer token authentication.

use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::db::Store;
use crate::models::Worker;
use crate::services::token::{TokenError, TokenSigner};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    Expired,

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

/// Resolves a bearer token to the worker it was issued to.
///
/// A token is honoured only while it is still present in the worker's
/// issued-token list, so revocation takes effect on the next request.
#[derive(Clone)]
pub struct TokenAuthenticator {
    signer: Arc<TokenSigner>,
    store: Store,
}

impl TokenAuthenticator {
    #[must_use]
    pub const fn new(signer: Arc<TokenSigner>, store: Store) -> Self {
        Self { signer, store }
    }

    pub async fn authenticate(&self, token: &str) -> Result<Worker, AuthError> {
        let claims = self.signer.verify(token).map_err(|e| match e {
            TokenError::Expired => {
                debug!("Rejected expired bearer token");
                AuthError::Expired
            }
            other => {
                debug!("Rejected bearer token: {}", other);
                AuthError::InvalidToken
            }
        })?;

        let worker_id = claims.worker_id();

        let Some(worker) = self.store.get_worker(&worker_id).await? else {
            debug!(worker_id = %worker_id, "Token refers to an unknown worker");
            return Err(AuthError::NotAuthenticated);
        };

        if !self.store.worker_has_token(&worker.id, token).await? {
            debug!(worker_id = %worker.id, "Token is not in the issued list");
            return Err(AuthError::NotAuthenticated);
        }

        Ok(worker)
    }
}
