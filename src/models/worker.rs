use serde::{Deserialize, Serialize};

use crate::domain::{Identified, WorkerId, WorkerState};

/// Public view of a worker.
///
/// Never carries the password hash or the issued-token list, so it is safe to
/// serialize straight into a response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Worker {
    pub id: WorkerId,
    pub name: String,
    pub weight_limit: f64,
    pub email: String,
    pub state: WorkerState,
    pub created_at: String,
    pub updated_at: String,
}

impl Identified for Worker {
    fn id_str(&self) -> &str {
        self.id.as_str()
    }
}

/// Registration input, before validation and hashing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWorker {
    pub name: String,
    pub weight_limit: f64,
    pub email: String,
    pub password: String,
}
