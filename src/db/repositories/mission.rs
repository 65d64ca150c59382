use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::Expr,
};
use tracing::{debug, warn};

use crate::db::now_timestamp;
use crate::domain::{ItemId, MissionId, MissionState, WorkerId, WorkerState};
use crate::entities::{missions, workers};
use crate::models::MissionRecord;

/// Result of a transition that touches a mission and its worker together.
///
/// Anything other than `Applied` means the transaction was rolled back and
/// neither record changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    Applied(MissionRecord),
    MissionMissing,
    WorkerMissing(WorkerId),
}

/// Number of missions in a given state owned by one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedCountRow {
    pub worker_id: WorkerId,
    pub count: i64,
}

pub struct MissionRepository {
    conn: DatabaseConnection,
}

impl MissionRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: missions::Model) -> Result<MissionRecord> {
        let item_ids: Vec<ItemId> = serde_json::from_str(&model.items)
            .with_context(|| format!("Corrupt item list on mission {}", model.id))?;
        let state: MissionState = model
            .state
            .parse()
            .with_context(|| format!("Corrupt state on mission {}", model.id))?;

        Ok(MissionRecord {
            id: MissionId::new(model.id),
            worker_id: WorkerId::new(model.worker_id),
            item_ids,
            state,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    pub async fn get(&self, id: &MissionId) -> Result<Option<MissionRecord>> {
        let mission = missions::Entity::find_by_id(id.as_str())
            .one(&self.conn)
            .await
            .context("Failed to query mission by ID")?;

        mission.map(Self::map_model).transpose()
    }

    pub async fn list(&self) -> Result<Vec<MissionRecord>> {
        let models = missions::Entity::find()
            .order_by_asc(missions::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list missions")?;

        models.into_iter().map(Self::map_model).collect()
    }

    /// Inserts a new in-progress mission and puts its worker on mission.
    pub async fn create(&self, worker_id: &WorkerId, item_ids: &[ItemId]) -> Result<TransitionOutcome> {
        let now = now_timestamp();
        let items_json = serde_json::to_string(item_ids)?;

        let txn = self.conn.begin().await?;

        let active = missions::ActiveModel {
            id: Set(MissionId::generate().into_inner()),
            worker_id: Set(worker_id.to_string()),
            items: Set(items_json),
            state: Set(MissionState::InProgress.as_str().to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
        };

        let model = active
            .insert(&txn)
            .await
            .context("Failed to insert mission")?;

        if !Self::set_worker_state(&txn, worker_id, WorkerState::OnMission, &now).await? {
            txn.rollback().await?;
            warn!("Worker {} vanished while creating mission, rolled back", worker_id);
            return Ok(TransitionOutcome::WorkerMissing(worker_id.clone()));
        }

        txn.commit().await?;

        debug!("Created mission {} for worker {}", model.id, worker_id);
        Ok(TransitionOutcome::Applied(Self::map_model(model)?))
    }

    /// Appends an item reference and moves the owning worker to `worker_state`.
    ///
    /// The capacity rule is not evaluated here. Two concurrent pushes that
    /// were each checked against the same prior weight will both be applied.
    pub async fn push_item(
        &self,
        mission_id: &MissionId,
        item_id: &ItemId,
        worker_state: WorkerState,
    ) -> Result<TransitionOutcome> {
        let now = now_timestamp();
        let txn = self.conn.begin().await?;

        let Some(model) = missions::Entity::find_by_id(mission_id.as_str())
            .one(&txn)
            .await
            .context("Failed to load mission for item push")?
        else {
            txn.rollback().await?;
            return Ok(TransitionOutcome::MissionMissing);
        };

        let worker_id = WorkerId::new(model.worker_id.clone());
        let mut item_ids: Vec<ItemId> = serde_json::from_str(&model.items)
            .with_context(|| format!("Corrupt item list on mission {}", model.id))?;
        item_ids.push(item_id.clone());

        let mut active: missions::ActiveModel = model.into();
        active.items = Set(serde_json::to_string(&item_ids)?);
        active.updated_at = Set(now.clone());
        let updated = active
            .update(&txn)
            .await
            .context("Failed to append mission item")?;

        if !Self::set_worker_state(&txn, &worker_id, worker_state, &now).await? {
            txn.rollback().await?;
            return Ok(TransitionOutcome::WorkerMissing(worker_id));
        }

        txn.commit().await?;
        Ok(TransitionOutcome::Applied(Self::map_model(updated)?))
    }

    /// Sets the mission state and the owning worker's state together.
    pub async fn set_state(
        &self,
        mission_id: &MissionId,
        state: MissionState,
        worker_state: WorkerState,
    ) -> Result<TransitionOutcome> {
        let now = now_timestamp();
        let txn = self.conn.begin().await?;

        let Some(model) = missions::Entity::find_by_id(mission_id.as_str())
            .one(&txn)
            .await
            .context("Failed to load mission for state change")?
        else {
            txn.rollback().await?;
            return Ok(TransitionOutcome::MissionMissing);
        };

        let worker_id = WorkerId::new(model.worker_id.clone());

        let mut active: missions::ActiveModel = model.into();
        active.state = Set(state.as_str().to_string());
        active.updated_at = Set(now.clone());
        let updated = active
            .update(&txn)
            .await
            .context("Failed to update mission state")?;

        if !Self::set_worker_state(&txn, &worker_id, worker_state, &now).await? {
            txn.rollback().await?;
            return Ok(TransitionOutcome::WorkerMissing(worker_id));
        }

        txn.commit().await?;
        Ok(TransitionOutcome::Applied(Self::map_model(updated)?))
    }

    /// Counts missions in `state` per worker, largest count first.
    pub async fn count_by_worker(&self, state: MissionState) -> Result<Vec<CompletedCountRow>> {
        let rows: Vec<(String, i64)> = missions::Entity::find()
            .select_only()
            .column(missions::Column::WorkerId)
            .column_as(missions::Column::Id.count(), "completed")
            .filter(missions::Column::State.eq(state.as_str()))
            .group_by(missions::Column::WorkerId)
            .order_by_desc(Expr::cust("completed"))
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to count missions per worker")?;

        Ok(rows
            .into_iter()
            .map(|(worker_id, count)| CompletedCountRow {
                worker_id: WorkerId::new(worker_id),
                count,
            })
            .collect())
    }

    /// Returns false when no worker row matched.
    async fn set_worker_state(
        txn: &DatabaseTransaction,
        worker_id: &WorkerId,
        state: WorkerState,
        now: &str,
    ) -> Result<bool> {
        let result = workers::Entity::update_many()
            .col_expr(workers::Column::State, Expr::value(state.as_str()))
            .col_expr(workers::Column::UpdatedAt, Expr::value(now))
            .filter(workers::Column::Id.eq(worker_id.as_str()))
            .exec(txn)
            .await
            .with_context(|| format!("Failed to set state of worker {worker_id}"))?;

        Ok(result.rows_affected > 0)
    }
}
