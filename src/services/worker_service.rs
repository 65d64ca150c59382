//! Read-side queries over workers.

use thiserror::Error;

use crate::db::Store;
use crate::domain::{WorkerId, WorkerState};
use crate::models::Worker;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Worker {0} not found")]
    NotFound(WorkerId),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for WorkerError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

#[async_trait::async_trait]
pub trait WorkerService: Send + Sync {
    async fn list_workers(&self) -> Result<Vec<Worker>, WorkerError>;

    async fn get_worker(&self, id: &WorkerId) -> Result<Worker, WorkerError>;

    /// Current state of a worker, as last set by a mission transition.
    async fn current_state(&self, id: &WorkerId) -> Result<WorkerState, WorkerError> {
        Ok(self.get_worker(id).await?.state)
    }
}

pub struct SeaOrmWorkerService {
    store: Store,
}

impl SeaOrmWorkerService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl WorkerService for SeaOrmWorkerService {
    async fn list_workers(&self) -> Result<Vec<Worker>, WorkerError> {
        Ok(self.store.list_workers().await?)
    }

    async fn get_worker(&self, id: &WorkerId) -> Result<Worker, WorkerError> {
        self.store
            .get_worker(id)
            .await?
            .ok_or_else(|| WorkerError::NotFound(id.clone()))
    }
}
