use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::collections::HashMap;

use crate::db::now_timestamp;
use crate::domain::ItemId;
use crate::entities::items;
use crate::models::Item;

#[derive(Debug, Clone)]
pub struct NewItemRow {
    pub name: String,
    pub weight: f64,
}

pub struct ItemRepository {
    conn: DatabaseConnection,
}

impl ItemRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: items::Model) -> Item {
        Item {
            id: ItemId::new(model.id),
            name: model.name,
            weight: model.weight,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }

    pub async fn insert(&self, row: NewItemRow) -> Result<Item> {
        let now = now_timestamp();

        let active = items::ActiveModel {
            id: Set(ItemId::generate().into_inner()),
            name: Set(row.name),
            weight: Set(row.weight),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert item")?;

        Ok(Self::map_model(model))
    }

    pub async fn get(&self, id: &ItemId) -> Result<Option<Item>> {
        let item = items::Entity::find_by_id(id.as_str())
            .one(&self.conn)
            .await
            .context("Failed to query item by ID")?;

        Ok(item.map(Self::map_model))
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<Item>> {
        let item = items::Entity::find()
            .filter(items::Column::Name.eq(name))
            .one(&self.conn)
            .await
            .context("Failed to query item by name")?;

        Ok(item.map(Self::map_model))
    }

    /// Looks up every distinct id once. Ids with no row are simply absent from
    /// the returned map.
    pub async fn get_by_ids(&self, ids: &[ItemId]) -> Result<HashMap<ItemId, Item>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut distinct: Vec<&str> = ids.iter().map(ItemId::as_str).collect();
        distinct.sort_unstable();
        distinct.dedup();

        let models = items::Entity::find()
            .filter(items::Column::Id.is_in(distinct))
            .all(&self.conn)
            .await
            .context("Failed to query items by IDs")?;

        Ok(models
            .into_iter()
            .map(|m| {
                let item = Self::map_model(m);
                (item.id.clone(), item)
            })
            .collect())
    }

    pub async fn list(&self) -> Result<Vec<Item>> {
        let models = items::Entity::find()
            .order_by_asc(items::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list items")?;

        Ok(models.into_iter().map(Self::map_model).collect())
    }
}
