use serde::Serialize;

use super::{Item, Worker};
use crate::domain::{ItemId, MissionId, MissionState, Reference, WorkerId};

/// A mission as stored: the worker and items are bare ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionRecord {
    pub id: MissionId,
    pub worker_id: WorkerId,
    pub item_ids: Vec<ItemId>,
    pub state: MissionState,
    pub created_at: String,
    pub updated_at: String,
}

/// A mission with its references looked up for presentation.
///
/// Item references that no longer resolve stay as [`Reference::Id`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    pub id: MissionId,
    pub worker: Reference<Worker>,
    pub items: Vec<Reference<Item>>,
    pub state: MissionState,
    pub created_at: String,
    pub updated_at: String,
}

impl Mission {
    /// Sum of the weights of the resolved items.
    #[must_use]
    pub fn loaded_weight(&self) -> f64 {
        self.items
            .iter()
            .filter_map(Reference::resolved)
            .map(|item| item.weight)
            .sum()
    }
}
