use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, Set, TransactionTrait,
};

use crate::entities::{invoice, order, payment};
use crate::errors::ServiceError;

use super::documents::DocumentService;

pub struct InvoiceService {
    db: Arc<DatabaseConnection>,
    documents: Arc<DocumentService>,
}

impl InvoiceService {
    pub fn new(db: Arc<DatabaseConnection>, documents: Arc<DocumentService>) -> Self {
        Self { db, documents }
    }

    pub async fn list(&self) -> Result<Vec<invoice::Model>, ServiceError> {
        Ok(invoice::Entity::find().all(&*self.db).await?)
    }

    pub async fn get(&self, id: i64) -> Result<invoice::Model, ServiceError> {
        invoice::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("invoice {}", id)))
    }

    /// Create an invoice and its PDF in one transaction: insert to obtain
    /// the identifier, render, store the path, commit. A render failure
    /// rolls the insert back.
    pub async fn create(
        &self,
        order_id: i64,
        total_amount: Decimal,
    ) -> Result<invoice::Model, ServiceError> {
        let order_exists = order::Entity::find_by_id(order_id).one(&*self.db).await?;
        if order_exists.is_none() {
            return Err(ServiceError::ValidationError(format!(
                "order {} does not exist",
                order_id
            )));
        }

        let txn = self.db.begin().await?;

        let inserted = invoice::ActiveModel {
            order_id: Set(order_id),
            total_amount: Set(total_amount),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let pdf_path = self
            .documents
            .invoice_pdf(inserted.id, inserted.order_id, inserted.total_amount)?;

        let mut active: invoice::ActiveModel = inserted.into();
        active.pdf_path = Set(Some(pdf_path));
        let created = active.update(&txn).await?;

        txn.commit().await?;

        tracing::info!(invoice_id = created.id, order_id, "invoice created");
        Ok(created)
    }

    /// Restricted delete: invoices with recorded payments stay.
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let existing = self.get(id).await?;

        let payments = payment::Entity::find()
            .filter(payment::Column::InvoiceId.eq(id))
            .count(&*self.db)
            .await?;
        if payments > 0 {
            return Err(ServiceError::ValidationError(format!(
                "cannot delete invoice {}: dependent records exist",
                id
            )));
        }

        existing.delete(&*self.db).await?;
        Ok(())
    }
}
