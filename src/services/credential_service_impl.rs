//! `SeaORM` implementation of the `CredentialService` trait.

use regex::Regex;
use std::sync::{Arc, OnceLock};
use tokio::task;
use tracing::{info, warn};

use crate::config::SecurityConfig;
use crate::db::{NewWorkerRow, Store, is_unique_violation};
use crate::domain::WorkerId;
use crate::models::{NewWorker, Worker};
use crate::services::credential_service::{CredentialError, CredentialService};
use crate::services::password::{hash_password, password_policy_violation, verify_password};
use crate::services::token::TokenSigner;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
            .expect("Invalid regex")
    })
}

/// Trims and lower-cases an email, rejecting anything that is not
/// `local@domain.tld`.
pub fn normalize_email(email: &str) -> Result<String, CredentialError> {
    let email = email.trim().to_lowercase();
    if !email_regex().is_match(&email) {
        return Err(CredentialError::Validation(format!(
            "Email is invalid: {email}"
        )));
    }
    Ok(email)
}

pub struct SeaOrmCredentialService {
    store: Store,
    signer: Arc<TokenSigner>,
    security: SecurityConfig,
}

impl SeaOrmCredentialService {
    #[must_use]
    pub const fn new(store: Store, signer: Arc<TokenSigner>, security: SecurityConfig) -> Self {
        Self {
            store,
            signer,
            security,
        }
    }
}

#[async_trait::async_trait]
impl CredentialService for SeaOrmCredentialService {
    async fn register(&self, new_worker: NewWorker) -> Result<Worker, CredentialError> {
        let name = new_worker.name.trim().to_string();
        if name.is_empty() {
            return Err(CredentialError::Validation("Name is required".to_string()));
        }

        if !new_worker.weight_limit.is_finite() || new_worker.weight_limit < 0.0 {
            return Err(CredentialError::Validation(
                "Weight limit must be a number >= 0".to_string(),
            ));
        }

        let email = normalize_email(&new_worker.email)?;

        let password = new_worker.password;
        if let Some(reason) = password_policy_violation(&password) {
            return Err(CredentialError::Validation(reason.to_string()));
        }

        if self.store.get_worker_by_email(&email).await?.is_some() {
            return Err(CredentialError::Validation(format!(
                "Email is already registered: {email}"
            )));
        }

        let security = self.security.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, &security))
            .await
            .map_err(|e| CredentialError::Internal(format!("Password hashing task panicked: {e}")))??;

        let worker = self
            .store
            .insert_worker(NewWorkerRow {
                name,
                email: email.clone(),
                password_hash,
                weight_limit: new_worker.weight_limit,
            })
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    CredentialError::Validation(format!("Email is already registered: {email}"))
                } else {
                    CredentialError::from(e)
                }
            })?;

        info!(worker_id = %worker.id, "Registered worker {}", worker.name);
        Ok(worker)
    }

    async fn verify_credentials(&self, email: &str, password: &str) -> Result<Worker, CredentialError> {
        let email = email.trim().to_lowercase();

        let Some((worker, password_hash)) = self.store.get_worker_with_password(&email).await? else {
            return Err(CredentialError::NoSuchWorker);
        };

        let password = password.to_string();

        // Argon2 verification is CPU-bound
        let is_valid = task::spawn_blocking(move || verify_password(&password, &password_hash))
            .await
            .map_err(|e| CredentialError::Internal(format!("Password verification task panicked: {e}")))??;

        if !is_valid {
            warn!(worker_id = %worker.id, "Rejected login with wrong password");
            return Err(CredentialError::WrongCredentials);
        }

        Ok(worker)
    }

    async fn issue_token(&self, worker: &Worker) -> Result<String, CredentialError> {
        let token = self.signer.issue(&worker.id)?;
        self.store.add_worker_token(&worker.id, &token).await?;
        Ok(token)
    }

    async fn revoke_token(&self, worker_id: &WorkerId, token: &str) -> Result<bool, CredentialError> {
        let removed = self.store.remove_worker_token(worker_id, token).await?;
        if removed {
            info!(worker_id = %worker_id, "Revoked token");
        }
        Ok(removed)
    }

    async fn revoke_all_tokens(&self, worker_id: &WorkerId) -> Result<u64, CredentialError> {
        let removed = self.store.remove_all_worker_tokens(worker_id).await?;
        info!(worker_id = %worker_id, "Revoked {} token(s)", removed);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ann@Example.COM ").unwrap(), "ann@example.com");
        assert!(normalize_email("first.last+tag@sub.example.org").is_ok());
    }

    #[test]
    fn test_normalize_email_rejects_malformed() {
        for bad in ["", "plain", "no-at.example.com", "a@b", "a@@b.com", "a b@c.com", "a@b.c"] {
            assert!(normalize_email(bad).is_err(), "{bad} should be rejected");
        }
    }
}
