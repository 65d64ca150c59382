//! Item catalog: standalone, immutable items with unique names.

use thiserror::Error;
use tracing::info;

use crate::db::{NewItemRow, Store, is_unique_violation};
use crate::domain::ItemId;
use crate::models::Item;

#[derive(Debug, Error)]
pub enum ItemError {
    #[error("Item {0} not found")]
    NotFound(ItemId),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for ItemError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ItemError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

#[async_trait::async_trait]
pub trait ItemService: Send + Sync {
    /// # Errors
    ///
    /// Returns [`ItemError::Validation`] for an empty or taken name and for a
    /// negative or non-finite weight.
    async fn create_item(&self, name: &str, weight: f64) -> Result<Item, ItemError>;

    async fn get_item(&self, id: &ItemId) -> Result<Item, ItemError>;

    async fn list_items(&self) -> Result<Vec<Item>, ItemError>;
}

pub struct SeaOrmItemService {
    store: Store,
}

impl SeaOrmItemService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl ItemService for SeaOrmItemService {
    async fn create_item(&self, name: &str, weight: f64) -> Result<Item, ItemError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ItemError::Validation("Name is required".to_string()));
        }

        if !weight.is_finite() || weight < 0.0 {
            return Err(ItemError::Validation("Weight must be a number >= 0".to_string()));
        }

        let taken = || ItemError::Validation(format!("Item name is already taken: {name}"));

        if self.store.get_item_by_name(name).await?.is_some() {
            return Err(taken());
        }

        let item = self
            .store
            .insert_item(NewItemRow {
                name: name.to_string(),
                weight,
            })
            .await
            .map_err(|e| if is_unique_violation(&e) { taken() } else { e.into() })?;

        info!(item_id = %item.id, "Created item {} ({})", item.name, item.weight);
        Ok(item)
    }

    async fn get_item(&self, id: &ItemId) -> Result<Item, ItemError> {
        self.store
            .get_item(id)
            .await?
            .ok_or_else(|| ItemError::NotFound(id.clone()))
    }

    async fn list_items(&self) -> Result<Vec<Item>, ItemError> {
        Ok(self.store.list_items().await?)
    }
}
