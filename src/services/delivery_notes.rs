use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, Set, TransactionTrait};

use crate::entities::{delivery_note, order};
use crate::errors::ServiceError;

use super::documents::DocumentService;

pub struct DeliveryNoteService {
    db: Arc<DatabaseConnection>,
    documents: Arc<DocumentService>,
}

impl DeliveryNoteService {
    pub fn new(db: Arc<DatabaseConnection>, documents: Arc<DocumentService>) -> Self {
        Self { db, documents }
    }

    pub async fn list(&self) -> Result<Vec<delivery_note::Model>, ServiceError> {
        Ok(delivery_note::Entity::find().all(&*self.db).await?)
    }

    pub async fn get(&self, id: i64) -> Result<delivery_note::Model, ServiceError> {
        delivery_note::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("delivery note {}", id)))
    }

    /// Insert, render and store the PDF path in one transaction.
    pub async fn create(&self, order_id: i64) -> Result<delivery_note::Model, ServiceError> {
        let order_exists = order::Entity::find_by_id(order_id).one(&*self.db).await?;
        if order_exists.is_none() {
            return Err(ServiceError::ValidationError(format!(
                "order {} does not exist",
                order_id
            )));
        }

        let txn = self.db.begin().await?;

        let inserted = delivery_note::ActiveModel {
            order_id: Set(order_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let pdf_path = self
            .documents
            .delivery_note_pdf(inserted.id, inserted.order_id)?;

        let mut active: delivery_note::ActiveModel = inserted.into();
        active.pdf_path = Set(Some(pdf_path));
        let created = active.update(&txn).await?;

        txn.commit().await?;

        tracing::info!(delivery_note_id = created.id, order_id, "delivery note generated");
        Ok(created)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let existing = self.get(id).await?;
        existing.delete(&*self.db).await?;
        Ok(())
    }
}
