use serde::Serialize;

use crate::domain::{Identified, ItemId};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub weight: f64,
    pub created_at: String,
    pub updated_at: String,
}

impl Identified for Item {
    fn id_str(&self) -> &str {
        self.id.as_str()
    }
}
