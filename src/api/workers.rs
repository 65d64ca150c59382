use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use std::sync::Arc;

use super::validation::{json_body, number_or, require_secret, require_str};
use super::{
    AllWorkersResponse, ApiError, AppState, CurrentStateResponse, MostCompletedResponse,
    RegisterRequest, SessionResponse, WorkerIdParams,
};
use crate::domain::WorkerId;
use crate::models::{NewWorker, Worker};
use crate::services::WorkerError;

const DEFAULT_WEIGHT_LIMIT: f64 = 100.0;

impl From<WorkerError> for ApiError {
    fn from(err: WorkerError) -> Self {
        match err {
            WorkerError::NotFound(id) => Self::not_found("Worker", id),
            WorkerError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

/// GET /worker/all
pub async fn list_workers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AllWorkersResponse>, ApiError> {
    let all_workers = state.shared.worker_service.list_workers().await?;
    Ok(Json(AllWorkersResponse { all_workers }))
}

/// GET /worker/details/{id}
pub async fn get_worker(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Worker>, ApiError> {
    let worker = state
        .shared
        .worker_service
        .get_worker(&WorkerId::new(id))
        .await?;
    Ok(Json(worker))
}

/// POST /worker/add
///
/// Registers a worker and logs them in with a first token.
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let payload = json_body(payload)?;

    let new_worker = NewWorker {
        name: require_str(payload.name, "name")?,
        weight_limit: number_or(payload.weight_limit, DEFAULT_WEIGHT_LIMIT, "weightLimit")?,
        email: require_str(payload.email, "email")?,
        password: require_secret(payload.password, "password")?,
    };

    let credentials = &state.shared.credential_service;
    let worker = credentials.register(new_worker).await?;
    let token = credentials.issue_token(&worker).await?;

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            worker,
            token,
            success: 1,
        }),
    ))
}

/// GET /worker/mostCompleted
pub async fn most_completed(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MostCompletedResponse>, ApiError> {
    let data = state.shared.reporter.most_completed_missions().await?;
    Ok(Json(MostCompletedResponse { data }))
}

/// GET /worker/currentState
///
/// The worker id is read from a JSON body, falling back to the `workerId`
/// query parameter.
pub async fn current_state(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WorkerIdParams>,
    body: Bytes,
) -> Result<Json<CurrentStateResponse>, ApiError> {
    let from_body = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        serde_json::from_slice::<WorkerIdParams>(&body)
            .map_err(|e| ApiError::validation(format!("Invalid request body: {e}")))?
            .worker_id
    };

    let worker_id = require_str(from_body.or(query.worker_id), "workerId")?;

    let status = state
        .shared
        .worker_service
        .current_state(&WorkerId::new(worker_id))
        .await?;

    Ok(Json(CurrentStateResponse { status }))
}
