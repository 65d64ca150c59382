use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use std::sync::Arc;

use super::validation::{json_body, require_str};
use super::{
    ApiError, AppState, CreateMissionRequest, LoadItemRequest, MissionIdRequest, MissionResponse,
    MissionsResponse,
};
use crate::domain::{ItemId, MissionId, WorkerId};
use crate::models::Mission;
use crate::services::MissionError;

impl From<MissionError> for ApiError {
    fn from(err: MissionError) -> Self {
        match err {
            MissionError::WorkerNotFound(id) => Self::not_found("Worker", id),
            MissionError::MissionNotFound(id) => Self::not_found("Mission", id),
            MissionError::ItemNotFound(id) => Self::not_found("Item", id),
            e @ MissionError::Capacity { .. } => Self::CapacityExceeded(e.to_string()),
            MissionError::Validation(msg) => Self::validation(msg),
            MissionError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

/// GET /mission/all
pub async fn list_missions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MissionsResponse>, ApiError> {
    let missions = state.shared.mission_service.list_missions().await?;
    Ok(Json(MissionsResponse { missions }))
}

/// GET /mission/details/{id}
pub async fn get_mission(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Mission>, ApiError> {
    let mission = state
        .shared
        .mission_service
        .get_mission(&MissionId::new(id))
        .await?;
    Ok(Json(mission))
}

/// POST /mission/add
pub async fn create_mission(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateMissionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MissionResponse>), ApiError> {
    let payload = json_body(payload)?;
    let worker_id = WorkerId::new(require_str(payload.worker, "worker")?);
    let item_ids: Vec<ItemId> = payload
        .items
        .unwrap_or_default()
        .into_iter()
        .map(ItemId::new)
        .collect();

    let mission = state
        .shared
        .mission_service
        .create_mission(&worker_id, &item_ids)
        .await?;

    Ok((StatusCode::CREATED, Json(MissionResponse { mission })))
}

/// PATCH /mission/loadItem
pub async fn load_item(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoadItemRequest>, JsonRejection>,
) -> Result<Json<MissionResponse>, ApiError> {
    let payload = json_body(payload)?;
    let mission_id = MissionId::new(require_str(payload.mission_id, "missionId")?);
    let item_id = ItemId::new(require_str(payload.item_id, "itemId")?);

    let mission = state
        .shared
        .mission_service
        .load_item(&mission_id, &item_id)
        .await?;

    Ok(Json(MissionResponse { mission }))
}

/// PATCH /mission/endMission
pub async fn end_mission(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MissionIdRequest>, JsonRejection>,
) -> Result<Json<MissionResponse>, ApiError> {
    let payload = json_body(payload)?;
    let mission_id = MissionId::new(require_str(payload.mission_id, "missionId")?);

    let mission = state.shared.mission_service.end_mission(&mission_id).await?;
    Ok(Json(MissionResponse { mission }))
}

/// PATCH /mission/failMission
pub async fn fail_mission(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MissionIdRequest>, JsonRejection>,
) -> Result<Json<MissionResponse>, ApiError> {
    let payload = json_body(payload)?;
    let mission_id = MissionId::new(require_str(payload.mission_id, "missionId")?);

    let mission = state.shared.mission_service.fail_mission(&mission_id).await?;
    Ok(Json(MissionResponse { mission }))
}
