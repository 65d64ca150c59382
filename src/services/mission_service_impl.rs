//! `SeaORM` implementation of the `MissionService` trait.

use std::collections::HashMap;
use tracing::{info, warn};

use crate::db::{Store, TransitionOutcome};
use crate::domain::{ItemId, MissionId, MissionState, Reference, WorkerId, WorkerState};
use crate::models::{Item, Mission, MissionRecord, Worker};
use crate::services::capacity::CapacityChecker;
use crate::services::mission_service::{MissionError, MissionService};

pub struct SeaOrmMissionService {
    store: Store,
    capacity: CapacityChecker,
}

impl SeaOrmMissionService {
    #[must_use]
    pub fn new(store: Store) -> Self {
        let capacity = CapacityChecker::new(store.clone());
        Self { store, capacity }
    }

    /// Resolves worker and item references of many missions with two lookups.
    async fn populate_many(&self, records: Vec<MissionRecord>) -> Result<Vec<Mission>, MissionError> {
        let worker_ids: Vec<WorkerId> = records.iter().map(|m| m.worker_id.clone()).collect();
        let item_ids: Vec<ItemId> = records
            .iter()
            .flat_map(|m| m.item_ids.iter().cloned())
            .collect();

        let workers = self.store.get_workers_by_ids(&worker_ids).await?;
        let items = self.store.get_items_by_ids(&item_ids).await?;

        Ok(records
            .into_iter()
            .map(|record| resolve(record, &workers, &items))
            .collect())
    }

    async fn populate(&self, record: MissionRecord) -> Result<Mission, MissionError> {
        let mut missions = self.populate_many(vec![record]).await?;
        missions
            .pop()
            .ok_or_else(|| MissionError::Database("Mission vanished while resolving".to_string()))
    }

    async fn finish_transition(
        &self,
        transition: &'static str,
        mission_id: &MissionId,
        outcome: TransitionOutcome,
    ) -> Result<Mission, MissionError> {
        match outcome {
            TransitionOutcome::Applied(record) => {
                metrics::counter!("missions_transitions_total", "transition" => transition)
                    .increment(1);
                self.populate(record).await
            }
            TransitionOutcome::MissionMissing => Err(MissionError::MissionNotFound(mission_id.clone())),
            TransitionOutcome::WorkerMissing(worker_id) => {
                warn!(mission_id = %mission_id, "Owning worker {} is gone, {} rolled back", worker_id, transition);
                Err(MissionError::WorkerNotFound(worker_id))
            }
        }
    }

    async fn require_mission(&self, mission_id: &MissionId) -> Result<MissionRecord, MissionError> {
        self.store
            .get_mission(mission_id)
            .await?
            .ok_or_else(|| MissionError::MissionNotFound(mission_id.clone()))
    }

    async fn require_worker(&self, worker_id: &WorkerId) -> Result<Worker, MissionError> {
        self.store
            .get_worker(worker_id)
            .await?
            .ok_or_else(|| MissionError::WorkerNotFound(worker_id.clone()))
    }
}

fn resolve(
    record: MissionRecord,
    workers: &HashMap<WorkerId, Worker>,
    items: &HashMap<ItemId, Item>,
) -> Mission {
    let worker = workers
        .get(&record.worker_id)
        .cloned()
        .map_or_else(|| Reference::Id(record.worker_id.to_string()), Reference::Resolved);

    let items = record
        .item_ids
        .iter()
        .map(|id| {
            items
                .get(id)
                .cloned()
                .map_or_else(|| Reference::Id(id.to_string()), Reference::Resolved)
        })
        .collect();

    Mission {
        id: record.id,
        worker,
        items,
        state: record.state,
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}

fn capacity_rejected(limit: f64, attempted: f64) -> MissionError {
    metrics::counter!("capacity_rejections_total").increment(1);
    MissionError::Capacity { limit, attempted }
}

#[async_trait::async_trait]
impl MissionService for SeaOrmMissionService {
    async fn create_mission(&self, worker_id: &WorkerId, item_ids: &[ItemId]) -> Result<Mission, MissionError> {
        let worker = self.require_worker(worker_id).await?;

        let found = self.store.get_items_by_ids(item_ids).await?;
        let mut items = Vec::with_capacity(item_ids.len());
        for id in item_ids {
            let item = found
                .get(id)
                .cloned()
                .ok_or_else(|| MissionError::ItemNotFound(id.clone()))?;
            items.push(item);
        }

        let check = CapacityChecker::check_initial(&worker, &items);
        if !check.allowed() {
            return Err(capacity_rejected(check.limit, check.attempted));
        }

        let outcome = self.store.create_mission(worker_id, item_ids).await?;
        let mission = match outcome {
            TransitionOutcome::Applied(record) => {
                metrics::counter!("missions_transitions_total", "transition" => "create")
                    .increment(1);
                record
            }
            TransitionOutcome::WorkerMissing(id) => return Err(MissionError::WorkerNotFound(id)),
            TransitionOutcome::MissionMissing => {
                return Err(MissionError::Database("Inserted mission not found".to_string()));
            }
        };

        info!(
            mission_id = %mission.id,
            worker_id = %worker_id,
            "Mission started with {} item(s)",
            mission.item_ids.len()
        );
        self.populate(mission).await
    }

    async fn load_item(&self, mission_id: &MissionId, item_id: &ItemId) -> Result<Mission, MissionError> {
        let item = self
            .store
            .get_item(item_id)
            .await?
            .ok_or_else(|| MissionError::ItemNotFound(item_id.clone()))?;
        let mission = self.require_mission(mission_id).await?;
        let worker = self.require_worker(&mission.worker_id).await?;

        let check = self.capacity.check(&worker, &mission, &item).await?;
        if !check.allowed() {
            info!(
                mission_id = %mission_id,
                worker_id = %worker.id,
                "Rejected item {}: {} > {}",
                item.id,
                check.attempted,
                check.limit
            );
            return Err(capacity_rejected(check.limit, check.attempted));
        }

        // Not atomic with the check above: concurrent loads on one mission
        // may each pass against the same prior weight.
        let outcome = self
            .store
            .push_mission_item(mission_id, item_id, WorkerState::Loading)
            .await?;

        self.finish_transition("load_item", mission_id, outcome).await
    }

    async fn end_mission(&self, mission_id: &MissionId) -> Result<Mission, MissionError> {
        let outcome = self
            .store
            .set_mission_state(mission_id, MissionState::Finished, WorkerState::Resting)
            .await?;

        let mission = self.finish_transition("end", mission_id, outcome).await?;
        info!(mission_id = %mission_id, "Mission finished");
        Ok(mission)
    }

    async fn fail_mission(&self, mission_id: &MissionId) -> Result<Mission, MissionError> {
        let record = self.require_mission(mission_id).await?;
        if record.state.is_terminal() {
            return Err(MissionError::Validation(format!(
                "Mission {mission_id} is {}, only in_progress missions can fail",
                record.state
            )));
        }

        let outcome = self
            .store
            .set_mission_state(mission_id, MissionState::Failed, WorkerState::Resting)
            .await?;

        let mission = self.finish_transition("fail", mission_id, outcome).await?;
        info!(mission_id = %mission_id, "Mission failed");
        Ok(mission)
    }

    async fn get_mission(&self, mission_id: &MissionId) -> Result<Mission, MissionError> {
        let record = self.require_mission(mission_id).await?;
        self.populate(record).await
    }

    async fn list_missions(&self) -> Result<Vec<Mission>, MissionError> {
        let records = self.store.list_missions().await?;
        self.populate_many(records).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(worker: &str, items: &[&str]) -> MissionRecord {
        MissionRecord {
            id: MissionId::new("m1"),
            worker_id: WorkerId::new(worker),
            item_ids: items.iter().map(|id| ItemId::new(*id)).collect(),
            state: MissionState::InProgress,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn item(id: &str, weight: f64) -> (ItemId, Item) {
        (
            ItemId::new(id),
            Item {
                id: ItemId::new(id),
                name: id.to_string(),
                weight,
                created_at: String::new(),
                updated_at: String::new(),
            },
        )
    }

    #[test]
    fn test_resolve_keeps_dangling_references_as_ids() {
        let items = HashMap::from([item("i1", 10.0)]);
        let mission = resolve(record("w-gone", &["i1", "i-gone", "i1"]), &HashMap::new(), &items);

        assert_eq!(mission.worker, Reference::Id("w-gone".to_string()));
        assert_eq!(mission.items.len(), 3);
        assert!(mission.items[0].is_resolved());
        assert_eq!(mission.items[1], Reference::Id("i-gone".to_string()));
        assert!(mission.items[2].is_resolved());
        assert!((mission.loaded_weight() - 20.0).abs() < f64::EPSILON);
    }
}
