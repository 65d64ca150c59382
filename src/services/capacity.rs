//! Weight capacity rule for missions.
//!
//! The total weight of a mission's items must never exceed the owning
//! worker's limit at the moment an item is added. A limit lowered later is
//! not applied retroactively.

use anyhow::{Result, anyhow};

use crate::db::Store;
use crate::models::{Item, MissionRecord, Worker};

/// Outcome of a capacity check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacityCheck {
    pub limit: f64,
    pub current: f64,
    /// Weight the mission would carry if the addition went through.
    pub attempted: f64,
}

impl CapacityCheck {
    #[must_use]
    pub fn allowed(&self) -> bool {
        self.attempted <= self.limit
    }
}

/// Sums item weights. Duplicates count once per occurrence.
#[must_use]
pub fn sum_weights<'a, I>(items: I) -> f64
where
    I: IntoIterator<Item = &'a Item>,
{
    items.into_iter().map(|item| item.weight).sum()
}

#[derive(Clone)]
pub struct CapacityChecker {
    store: Store,
}

impl CapacityChecker {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Current loaded weight of a mission. Dangling item references weigh 0.
    pub async fn current_weight(&self, mission: &MissionRecord) -> Result<f64> {
        let items = self.store.get_items_by_ids(&mission.item_ids).await?;

        Ok(mission
            .item_ids
            .iter()
            .filter_map(|id| items.get(id))
            .map(|item| item.weight)
            .sum())
    }

    /// Full verdict for adding `item` to `mission` owned by `worker`.
    pub async fn check(&self, worker: &Worker, mission: &MissionRecord, item: &Item) -> Result<CapacityCheck> {
        let current = self.current_weight(mission).await?;
        Ok(CapacityCheck {
            limit: worker.weight_limit,
            current,
            attempted: current + item.weight,
        })
    }

    /// Whether `item` fits into `mission`, judged against the owning worker
    /// as currently stored.
    pub async fn can_add(&self, mission: &MissionRecord, item: &Item) -> Result<bool> {
        let worker = self
            .store
            .get_worker(&mission.worker_id)
            .await?
            .ok_or_else(|| anyhow!("Worker {} of mission {} not found", mission.worker_id, mission.id))?;

        Ok(self.check(&worker, mission, item).await?.allowed())
    }

    /// Same rule applied to the initial item list of a new mission.
    #[must_use]
    pub fn check_initial(worker: &Worker, items: &[Item]) -> CapacityCheck {
        let attempted = sum_weights(items);
        CapacityCheck {
            limit: worker.weight_limit,
            current: 0.0,
            attempted,
        }
    }
}
