use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, Set,
};

use crate::entities::{delivery_note, invoice, order};
use crate::errors::ServiceError;

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_name: String,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct OrderPatch {
    pub customer_name: Option<String>,
    pub status: Option<String>,
}

pub struct OrderService {
    db: Arc<DatabaseConnection>,
}

impl OrderService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<order::Model>, ServiceError> {
        Ok(order::Entity::find().all(&*self.db).await?)
    }

    pub async fn get(&self, id: i64) -> Result<order::Model, ServiceError> {
        order::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("order {}", id)))
    }

    pub async fn create(&self, input: NewOrder) -> Result<order::Model, ServiceError> {
        let model = order::ActiveModel {
            customer_name: Set(input.customer_name),
            status: Set(input.status.unwrap_or_else(|| "pending".to_string())),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let created = model.insert(&*self.db).await?;
        tracing::info!(order_id = created.id, "order created");
        Ok(created)
    }

    pub async fn update(&self, id: i64, patch: OrderPatch) -> Result<order::Model, ServiceError> {
        let existing = self.get(id).await?;

        // An empty patch is a no-op acknowledgment.
        if patch.customer_name.is_none() && patch.status.is_none() {
            return Ok(existing);
        }

        let mut active: order::ActiveModel = existing.into();
        if let Some(customer_name) = patch.customer_name {
            active.customer_name = Set(customer_name);
        }
        if let Some(status) = patch.status {
            active.status = Set(status);
        }

        Ok(active.update(&*self.db).await?)
    }

    /// Deletion is restricted: an order with invoices or delivery notes
    /// cannot be removed, so no dangling references are left behind.
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let existing = self.get(id).await?;

        let invoices = invoice::Entity::find()
            .filter(invoice::Column::OrderId.eq(id))
            .count(&*self.db)
            .await?;
        let delivery_notes = delivery_note::Entity::find()
            .filter(delivery_note::Column::OrderId.eq(id))
            .count(&*self.db)
            .await?;
        if invoices > 0 || delivery_notes > 0 {
            return Err(ServiceError::ValidationError(format!(
                "cannot delete order {}: dependent records exist",
                id
            )));
        }

        existing.delete(&*self.db).await?;
        Ok(())
    }
}
