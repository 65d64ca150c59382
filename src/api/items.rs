use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use std::sync::Arc;

use super::validation::{json_body, number_or, require_str};
use super::{ApiError, AppState, CreateItemRequest, ItemResponse, ItemsResponse};
use crate::domain::ItemId;
use crate::models::Item;
use crate::services::ItemError;

impl From<ItemError> for ApiError {
    fn from(err: ItemError) -> Self {
        match err {
            ItemError::NotFound(id) => Self::not_found("Item", id),
            ItemError::Validation(msg) => Self::validation(msg),
            ItemError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

/// GET /item/all
pub async fn list_items(State(state): State<Arc<AppState>>) -> Result<Json<ItemsResponse>, ApiError> {
    let items = state.shared.item_service.list_items().await?;
    Ok(Json(ItemsResponse { items }))
}

/// GET /item/details/{id}
pub async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Item>, ApiError> {
    let item = state.shared.item_service.get_item(&ItemId::new(id)).await?;
    Ok(Json(item))
}

/// POST /item/add
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateItemRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ItemResponse>), ApiError> {
    let payload = json_body(payload)?;
    let name = require_str(payload.name, "name")?;
    let weight = number_or(payload.weight, 0.0, "weight")?;

    let item = state.shared.item_service.create_item(&name, weight).await?;
    Ok((StatusCode::CREATED, Json(ItemResponse { item })))
}
