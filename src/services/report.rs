//! Aggregate reports over missions.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use crate::db::{CompletedCountRow, Store};
use crate::domain::{MissionState, WorkerId};
use crate::models::Worker;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedMissions {
    pub worker_id: WorkerId,
    pub name: String,
    pub completed_missions: i64,
}

#[derive(Clone)]
pub struct AggregationReporter {
    store: Store,
}

impl AggregationReporter {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Finished missions per worker, most first.
    ///
    /// Workers with no finished mission do not appear. Recomputed on every call.
    pub async fn most_completed_missions(&self) -> Result<Vec<CompletedMissions>> {
        let counts = self.store.count_missions_by_state(MissionState::Finished).await?;

        let ids: Vec<WorkerId> = counts.iter().map(|row| row.worker_id.clone()).collect();
        let workers = self.store.get_workers_by_ids(&ids).await?;

        Ok(rank(counts, &workers))
    }
}

fn rank(counts: Vec<CompletedCountRow>, workers: &HashMap<WorkerId, Worker>) -> Vec<CompletedMissions> {
    let mut rows: Vec<CompletedMissions> = counts
        .into_iter()
        .filter_map(|row| {
            let Some(worker) = workers.get(&row.worker_id) else {
                debug!("Dropping {} finished mission(s) of missing worker {}", row.count, row.worker_id);
                return None;
            };
            Some(CompletedMissions {
                worker_id: row.worker_id,
                name: worker.name.clone(),
                completed_missions: row.count,
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        b.completed_missions
            .cmp(&a.completed_missions)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.worker_id.cmp(&b.worker_id))
    });
    rows
}
