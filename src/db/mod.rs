use anyhow::Result;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, SqlErr, Statement,
};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::domain::{ItemId, MissionId, MissionState, WorkerId, WorkerState};
use crate::models::{Item, MissionRecord, Worker};

pub mod migrator;
pub mod repositories;

pub use repositories::item::NewItemRow;
pub use repositories::mission::{CompletedCountRow, TransitionOutcome};
pub use repositories::worker::NewWorkerRow;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        // Every pooled connection to `:memory:` would be its own empty database
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            (max_connections, min_connections)
        };

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        if !in_memory {
            opt.idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
        }

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn worker_repo(&self) -> repositories::worker::WorkerRepository {
        repositories::worker::WorkerRepository::new(self.conn.clone())
    }

    fn item_repo(&self) -> repositories::item::ItemRepository {
        repositories::item::ItemRepository::new(self.conn.clone())
    }

    fn mission_repo(&self) -> repositories::mission::MissionRepository {
        repositories::mission::MissionRepository::new(self.conn.clone())
    }

    // ========================================================================
    // Workers & tokens
    // ========================================================================

    pub async fn insert_worker(&self, row: NewWorkerRow) -> Result<Worker> {
        self.worker_repo().insert(row).await
    }

    pub async fn get_worker(&self, id: &WorkerId) -> Result<Option<Worker>> {
        self.worker_repo().get(id).await
    }

    pub async fn get_workers_by_ids(&self, ids: &[WorkerId]) -> Result<HashMap<WorkerId, Worker>> {
        self.worker_repo().get_by_ids(ids).await
    }

    pub async fn get_worker_by_email(&self, email: &str) -> Result<Option<Worker>> {
        self.worker_repo().get_by_email(email).await
    }

    pub async fn get_worker_with_password(&self, email: &str) -> Result<Option<(Worker, String)>> {
        self.worker_repo().get_by_email_with_password(email).await
    }

    pub async fn list_workers(&self) -> Result<Vec<Worker>> {
        self.worker_repo().list().await
    }

    pub async fn add_worker_token(&self, worker_id: &WorkerId, token: &str) -> Result<()> {
        self.worker_repo().add_token(worker_id, token).await
    }

    pub async fn worker_has_token(&self, worker_id: &WorkerId, token: &str) -> Result<bool> {
        self.worker_repo().has_token(worker_id, token).await
    }

    pub async fn list_worker_tokens(&self, worker_id: &WorkerId) -> Result<Vec<String>> {
        self.worker_repo().list_tokens(worker_id).await
    }

    pub async fn remove_worker_token(&self, worker_id: &WorkerId, token: &str) -> Result<bool> {
        self.worker_repo().remove_token(worker_id, token).await
    }

    pub async fn remove_all_worker_tokens(&self, worker_id: &WorkerId) -> Result<u64> {
        self.worker_repo().remove_all_tokens(worker_id).await
    }

    // ========================================================================
    // Items
    // ========================================================================

    pub async fn insert_item(&self, row: NewItemRow) -> Result<Item> {
        self.item_repo().insert(row).await
    }

    pub async fn get_item(&self, id: &ItemId) -> Result<Option<Item>> {
        self.item_repo().get(id).await
    }

    pub async fn get_item_by_name(&self, name: &str) -> Result<Option<Item>> {
        self.item_repo().get_by_name(name).await
    }

    pub async fn get_items_by_ids(&self, ids: &[ItemId]) -> Result<HashMap<ItemId, Item>> {
        self.item_repo().get_by_ids(ids).await
    }

    pub async fn list_items(&self) -> Result<Vec<Item>> {
        self.item_repo().list().await
    }

    // ========================================================================
    // Missions
    // ========================================================================

    pub async fn get_mission(&self, id: &MissionId) -> Result<Option<MissionRecord>> {
        self.mission_repo().get(id).await
    }

    pub async fn list_missions(&self) -> Result<Vec<MissionRecord>> {
        self.mission_repo().list().await
    }

    pub async fn create_mission(
        &self,
        worker_id: &WorkerId,
        item_ids: &[ItemId],
    ) -> Result<TransitionOutcome> {
        self.mission_repo().create(worker_id, item_ids).await
    }

    pub async fn push_mission_item(
        &self,
        mission_id: &MissionId,
        item_id: &ItemId,
        worker_state: WorkerState,
    ) -> Result<TransitionOutcome> {
        self.mission_repo()
            .push_item(mission_id, item_id, worker_state)
            .await
    }

    pub async fn set_mission_state(
        &self,
        mission_id: &MissionId,
        state: MissionState,
        worker_state: WorkerState,
    ) -> Result<TransitionOutcome> {
        self.mission_repo()
            .set_state(mission_id, state, worker_state)
            .await
    }

    pub async fn count_missions_by_state(&self, state: MissionState) -> Result<Vec<CompletedCountRow>> {
        self.mission_repo().count_by_worker(state).await
    }
}

/// Whether an error bubbled up from the database is a unique index violation.
#[must_use]
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<DbErr>()
        .and_then(DbErr::sql_err)
        .is_some_and(|e| matches!(e, SqlErr::UniqueConstraintViolation(_)))
}

pub(crate) fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}
