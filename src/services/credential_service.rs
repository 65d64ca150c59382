//! Domain service for worker credentials.
//!
//! Handles registration (with password hashing), credential checks, and the
//! per-worker list of issued bearer tokens.

use thiserror::Error;

use crate::domain::WorkerId;
use crate::models::{NewWorker, Worker};
use crate::services::token::TokenError;

/// Errors specific to credential operations.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unable to login, no such worker")]
    NoSuchWorker,

    #[error("Wrong credentials")]
    WrongCredentials,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for CredentialError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for CredentialError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}

/// Domain service trait for worker credentials.
#[async_trait::async_trait]
pub trait CredentialService: Send + Sync {
    /// Validates and stores a new worker with a hashed password.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Validation`] for a malformed or taken email,
    /// a weak password, an empty name or a negative weight limit.
    async fn register(&self, new_worker: NewWorker) -> Result<Worker, CredentialError>;

    /// Looks up a worker by email and checks the password.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::NoSuchWorker`] or
    /// [`CredentialError::WrongCredentials`].
    async fn verify_credentials(&self, email: &str, password: &str) -> Result<Worker, CredentialError>;

    /// Signs a new token and appends it to the worker's issued-token list.
    async fn issue_token(&self, worker: &Worker) -> Result<String, CredentialError>;

    /// Removes one token from the issued list. Returns whether it was present.
    async fn revoke_token(&self, worker_id: &WorkerId, token: &str) -> Result<bool, CredentialError>;

    /// Removes every issued token of a worker and returns how many there were.
    async fn revoke_all_tokens(&self, worker_id: &WorkerId) -> Result<u64, CredentialError>;
}
