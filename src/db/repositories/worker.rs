use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use std::collections::HashMap;

use crate::db::now_timestamp;
use crate::domain::{WorkerId, WorkerState};
use crate::entities::{worker_tokens, workers};
use crate::models::Worker;

/// Validated, already-hashed worker ready for insertion.
#[derive(Debug, Clone)]
pub struct NewWorkerRow {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub weight_limit: f64,
}

pub struct WorkerRepository {
    conn: DatabaseConnection,
}

impl WorkerRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub(crate) fn map_model(model: workers::Model) -> Result<Worker> {
        let state: WorkerState = model
            .state
            .parse()
            .with_context(|| format!("Corrupt state on worker {}", model.id))?;

        Ok(Worker {
            id: WorkerId::new(model.id),
            name: model.name,
            weight_limit: model.weight_limit,
            email: model.email,
            state,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    pub async fn insert(&self, row: NewWorkerRow) -> Result<Worker> {
        let now = now_timestamp();

        let active = workers::ActiveModel {
            id: Set(WorkerId::generate().into_inner()),
            name: Set(row.name),
            email: Set(row.email),
            password_hash: Set(row.password_hash),
            weight_limit: Set(row.weight_limit),
            state: Set(WorkerState::Resting.as_str().to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert worker")?;

        Self::map_model(model)
    }

    pub async fn get(&self, id: &WorkerId) -> Result<Option<Worker>> {
        let worker = workers::Entity::find_by_id(id.as_str())
            .one(&self.conn)
            .await
            .context("Failed to query worker by ID")?;

        worker.map(Self::map_model).transpose()
    }

    pub async fn get_by_ids(&self, ids: &[WorkerId]) -> Result<HashMap<WorkerId, Worker>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let models = workers::Entity::find()
            .filter(workers::Column::Id.is_in(ids.iter().map(WorkerId::as_str)))
            .all(&self.conn)
            .await
            .context("Failed to query workers by IDs")?;

        models
            .into_iter()
            .map(|m| Self::map_model(m).map(|w| (w.id.clone(), w)))
            .collect()
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<Worker>> {
        let worker = workers::Entity::find()
            .filter(workers::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query worker by email")?;

        worker.map(Self::map_model).transpose()
    }

    /// Get worker by email together with the stored password hash (for login)
    pub async fn get_by_email_with_password(&self, email: &str) -> Result<Option<(Worker, String)>> {
        let worker = workers::Entity::find()
            .filter(workers::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query worker for credential check")?;

        worker
            .map(|m| {
                let password_hash = m.password_hash.clone();
                Self::map_model(m).map(|w| (w, password_hash))
            })
            .transpose()
    }

    pub async fn list(&self) -> Result<Vec<Worker>> {
        let models = workers::Entity::find()
            .order_by_asc(workers::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list workers")?;

        models.into_iter().map(Self::map_model).collect()
    }

    // ========================================================================
    // Issued tokens
    // ========================================================================

    pub async fn add_token(&self, worker_id: &WorkerId, token: &str) -> Result<()> {
        let active = worker_tokens::ActiveModel {
            worker_id: Set(worker_id.to_string()),
            token: Set(token.to_string()),
            created_at: Set(now_timestamp()),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .with_context(|| format!("Failed to store token for worker {worker_id}"))?;

        Ok(())
    }

    pub async fn has_token(&self, worker_id: &WorkerId, token: &str) -> Result<bool> {
        let count = worker_tokens::Entity::find()
            .filter(worker_tokens::Column::WorkerId.eq(worker_id.as_str()))
            .filter(worker_tokens::Column::Token.eq(token))
            .count(&self.conn)
            .await
            .context("Failed to query worker token")?;

        Ok(count > 0)
    }

    pub async fn list_tokens(&self, worker_id: &WorkerId) -> Result<Vec<String>> {
        let tokens: Vec<String> = worker_tokens::Entity::find()
            .select_only()
            .column(worker_tokens::Column::Token)
            .filter(worker_tokens::Column::WorkerId.eq(worker_id.as_str()))
            .order_by_asc(worker_tokens::Column::Id)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to list worker tokens")?;

        Ok(tokens)
    }

    pub async fn remove_token(&self, worker_id: &WorkerId, token: &str) -> Result<bool> {
        let result = worker_tokens::Entity::delete_many()
            .filter(worker_tokens::Column::WorkerId.eq(worker_id.as_str()))
            .filter(worker_tokens::Column::Token.eq(token))
            .exec(&self.conn)
            .await
            .context("Failed to revoke worker token")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn remove_all_tokens(&self, worker_id: &WorkerId) -> Result<u64> {
        let result = worker_tokens::Entity::delete_many()
            .filter(worker_tokens::Column::WorkerId.eq(worker_id.as_str()))
            .exec(&self.conn)
            .await
            .context("Failed to revoke worker tokens")?;

        Ok(result.rows_affected)
    }
}
