use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, patch, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::SharedState;

pub mod auth;
mod error;
mod items;
mod missions;
mod observability;
mod types;
mod validation;
mod workers;

pub use auth::AuthenticatedWorker;
pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let protected_routes = create_protected_router(state.clone());

    let cors_layer = if cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .merge(protected_routes)
        .route("/worker/details/{id}", get(workers::get_worker))
        .route("/worker/add", post(workers::register))
        .route("/worker/mostCompleted", get(workers::most_completed))
        .route("/worker/currentState", get(workers::current_state))
        .route("/worker/login", post(auth::login))
        .route("/item/details/{id}", get(items::get_item))
        .route("/item/add", post(items::create_item))
        .route("/mission/all", get(missions::list_missions))
        .route("/mission/details/{id}", get(missions::get_mission))
        .route("/mission/add", post(missions::create_mission))
        .route("/mission/loadItem", patch(missions::load_item))
        .route("/mission/endMission", patch(missions::end_mission))
        .route("/mission/failMission", patch(missions::fail_mission))
        .route("/metrics", get(observability::get_metrics))
        .with_state(state)
        .layer(middleware::from_fn(observability::security_headers_middleware))
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/worker/all", get(workers::list_workers))
        .route("/worker/logout", post(auth::logout))
        .route("/item/all", get(items::list_items))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
