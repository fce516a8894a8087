use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, Set, TransactionTrait};

use crate::entities::{payment, receipt};
use crate::errors::ServiceError;

use super::documents::DocumentService;

pub struct ReceiptService {
    db: Arc<DatabaseConnection>,
    documents: Arc<DocumentService>,
}

impl ReceiptService {
    pub fn new(db: Arc<DatabaseConnection>, documents: Arc<DocumentService>) -> Self {
        Self { db, documents }
    }

    pub async fn list(&self) -> Result<Vec<receipt::Model>, ServiceError> {
        Ok(receipt::Entity::find().all(&*self.db).await?)
    }

    pub async fn get(&self, id: i64) -> Result<receipt::Model, ServiceError> {
        receipt::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("receipt {}", id)))
    }

    /// Insert, render and store the PDF path in one transaction.
    pub async fn create(&self, payment_id: i64) -> Result<receipt::Model, ServiceError> {
        let payment_exists = payment::Entity::find_by_id(payment_id).one(&*self.db).await?;
        if payment_exists.is_none() {
            return Err(ServiceError::ValidationError(format!(
                "payment {} does not exist",
                payment_id
            )));
        }

        let txn = self.db.begin().await?;

        let inserted = receipt::ActiveModel {
            payment_id: Set(payment_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let pdf_path = self.documents.receipt_pdf(inserted.id, inserted.payment_id)?;

        let mut active: receipt::ActiveModel = inserted.into();
        active.pdf_path = Set(Some(pdf_path));
        let created = active.update(&txn).await?;

        txn.commit().await?;

        tracing::info!(receipt_id = created.id, payment_id, "receipt generated");
        Ok(created)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let existing = self.get(id).await?;
        existing.delete(&*self.db).await?;
        Ok(())
    }
}
