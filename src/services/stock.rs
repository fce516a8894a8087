use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, Set, TransactionTrait};

use crate::entities::stock_item;
use crate::errors::ServiceError;

/// Input for a single stock item insert.
#[derive(Debug, Clone)]
pub struct NewStockItem {
    pub item_name: String,
    pub category: Option<String>,
    pub unit_price: Option<Decimal>,
    pub quantity: i64,
}

/// Partial update; omitted fields retain their prior value.
#[derive(Debug, Clone, Default)]
pub struct StockItemPatch {
    pub item_name: Option<String>,
    pub category: Option<String>,
    pub unit_price: Option<Decimal>,
    pub quantity: Option<i64>,
}

pub struct StockService {
    db: Arc<DatabaseConnection>,
}

impl StockService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<stock_item::Model>, ServiceError> {
        Ok(stock_item::Entity::find().all(&*self.db).await?)
    }

    pub async fn get(&self, id: i64) -> Result<stock_item::Model, ServiceError> {
        stock_item::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("stock item {}", id)))
    }

    /// Insert a batch of items atomically: one transaction for the whole
    /// batch, so a failure on any entry leaves nothing behind.
    pub async fn create_batch(
        &self,
        items: Vec<NewStockItem>,
    ) -> Result<Vec<stock_item::Model>, ServiceError> {
        let txn = self.db.begin().await?;
        let mut created = Vec::with_capacity(items.len());
        for item in items {
            let model = stock_item::ActiveModel {
                item_name: Set(item.item_name),
                category: Set(item.category),
                unit_price: Set(item.unit_price),
                quantity: Set(item.quantity),
                last_updated: Set(Utc::now()),
                ..Default::default()
            };
            created.push(model.insert(&txn).await?);
        }
        txn.commit().await?;

        tracing::info!(count = created.len(), "stock items added");
        Ok(created)
    }

    pub async fn update(
        &self,
        id: i64,
        patch: StockItemPatch,
    ) -> Result<stock_item::Model, ServiceError> {
        let existing = self.get(id).await?;

        let mut active: stock_item::ActiveModel = existing.into();
        if let Some(item_name) = patch.item_name {
            active.item_name = Set(item_name);
        }
        if let Some(category) = patch.category {
            active.category = Set(Some(category));
        }
        if let Some(unit_price) = patch.unit_price {
            active.unit_price = Set(Some(unit_price));
        }
        if let Some(quantity) = patch.quantity {
            active.quantity = Set(quantity);
        }
        active.last_updated = Set(Utc::now());

        Ok(active.update(&*self.db).await?)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let existing = self.get(id).await?;
        existing.delete(&*self.db).await?;
        Ok(())
    }
}
