use axum::{
    Extension, Json,
    extract::{Request, State, rejection::JsonRejection},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::validation::{json_body, require_secret, require_str};
use super::{ApiError, AppState, LoginRequest, SessionResponse, SuccessResponse};
use crate::models::Worker;
use crate::services::{AuthError, CredentialError};

/// The worker and raw token behind an authenticated request.
#[derive(Debug, Clone)]
pub struct AuthenticatedWorker {
    pub worker: Worker,
    pub token: String,
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Database(msg) => Self::DatabaseError(msg),
            AuthError::Expired | AuthError::InvalidToken | AuthError::NotAuthenticated => {
                Self::unauthorized("Not authenticated")
            }
        }
    }
}

impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::Validation(msg) => Self::validation(msg),
            CredentialError::NoSuchWorker => Self::unauthorized("Unable to login, no such worker"),
            CredentialError::WrongCredentials => Self::unauthorized("Wrong credentials"),
            CredentialError::Token(e) => Self::internal(e.to_string()),
            CredentialError::Database(msg) => Self::DatabaseError(msg),
            CredentialError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Requires `Authorization: Bearer <token>` naming a currently issued token.
///
/// On success the [`AuthenticatedWorker`] is added to the request extensions.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(request.headers())
        .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;

    let worker = state.shared.authenticator.authenticate(&token).await?;

    tracing::Span::current().record("worker_id", worker.id.as_str());
    request
        .extensions_mut()
        .insert(AuthenticatedWorker { worker, token });

    Ok(next.run(request).await)
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /worker/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>, ApiError> {
    let payload = json_body(payload)?;
    let email = require_str(payload.email, "email")?;
    let password = require_secret(payload.password, "password")?;

    let credentials = &state.shared.credential_service;
    let worker = credentials.verify_credentials(&email, &password).await?;
    let token = credentials.issue_token(&worker).await?;

    tracing::info!(worker_id = %worker.id, "Worker logged in");

    Ok(Json(SessionResponse {
        worker,
        token,
        success: 1,
    }))
}

/// POST /worker/logout
///
/// Revokes only the token the request was made with.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthenticatedWorker>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state
        .shared
        .credential_service
        .revoke_token(&auth.worker.id, &auth.token)
        .await?;

    Ok(Json(SuccessResponse { success: 1 }))
}
