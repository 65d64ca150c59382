use serde::{Deserialize, Serialize};

use crate::domain::WorkerState;
use crate::models::{Item, Mission, Worker};
use crate::services::CompletedMissions;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

// ============================================================================
// Workers
// ============================================================================

/// Registration body. Fields are optional so a missing one surfaces as a
/// validation error rather than a body rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub weight_limit: Option<f64>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkerIdParams {
    pub worker_id: Option<String>,
}

/// Returned by registration and login.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub worker: Worker,
    pub token: String,
    pub success: u8,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: u8,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllWorkersResponse {
    pub all_workers: Vec<Worker>,
}

#[derive(Debug, Serialize)]
pub struct MostCompletedResponse {
    pub data: Vec<CompletedMissions>,
}

#[derive(Debug, Serialize)]
pub struct CurrentStateResponse {
    pub status: WorkerState,
}

// ============================================================================
// Items
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateItemRequest {
    pub name: Option<String>,
    pub weight: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ItemsResponse {
    pub items: Vec<Item>,
}

#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub item: Item,
}

// ============================================================================
// Missions
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateMissionRequest {
    pub worker: Option<String>,
    pub items: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoadItemRequest {
    pub mission_id: Option<String>,
    pub item_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MissionIdRequest {
    pub mission_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MissionsResponse {
    pub missions: Vec<Mission>,
}

#[derive(Debug, Serialize)]
pub struct MissionResponse {
    pub mission: Mission,
}
