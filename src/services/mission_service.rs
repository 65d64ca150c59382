//! Domain service for the mission lifecycle.
//!
//! Every transition changes a mission and its worker together:
//!
//! | Operation       | Mission      | Worker      |
//! |-----------------|--------------|-------------|
//! | create          | in_progress  | onMission   |
//! | load item       | (item added) | loading     |
//! | end             | finished     | resting     |
//! | fail            | failed       | resting     |

use thiserror::Error;

use crate::domain::{ItemId, MissionId, WorkerId};
use crate::models::Mission;

#[derive(Debug, Error)]
pub enum MissionError {
    #[error("Worker {0} not found")]
    WorkerNotFound(WorkerId),

    #[error("Mission {0} not found")]
    MissionNotFound(MissionId),

    #[error("Item {0} not found")]
    ItemNotFound(ItemId),

    #[error("Weight limit exceeded: limit is {limit}, attempted total is {attempted}")]
    Capacity { limit: f64, attempted: f64 },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for MissionError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for MissionError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

#[async_trait::async_trait]
pub trait MissionService: Send + Sync {
    /// Starts a mission for a worker with an initial item list.
    ///
    /// # Errors
    ///
    /// Returns [`MissionError::WorkerNotFound`] or [`MissionError::ItemNotFound`]
    /// for unknown references and [`MissionError::Capacity`] if the initial
    /// items are heavier than the worker's limit.
    async fn create_mission(&self, worker_id: &WorkerId, item_ids: &[ItemId]) -> Result<Mission, MissionError>;

    /// Adds an item to a mission if it still fits the worker's limit.
    ///
    /// A rejected load leaves both the mission and the worker untouched.
    async fn load_item(&self, mission_id: &MissionId, item_id: &ItemId) -> Result<Mission, MissionError>;

    /// Marks a mission finished and sends its worker back to rest.
    async fn end_mission(&self, mission_id: &MissionId) -> Result<Mission, MissionError>;

    /// Marks an in-progress mission failed and sends its worker back to rest.
    ///
    /// # Errors
    ///
    /// Returns [`MissionError::Validation`] if the mission is not in progress.
    async fn fail_mission(&self, mission_id: &MissionId) -> Result<Mission, MissionError>;

    async fn get_mission(&self, mission_id: &MissionId) -> Result<Mission, MissionError>;

    async fn list_missions(&self) -> Result<Vec<Mission>, MissionError>;
}
