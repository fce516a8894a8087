use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, Set,
};

use crate::entities::{invoice, payment, receipt};
use crate::errors::ServiceError;

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub invoice_id: i64,
    pub amount: Decimal,
    pub payment_method: Option<String>,
    pub status: Option<String>,
    pub reference: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PaymentPatch {
    pub amount: Option<Decimal>,
    pub payment_method: Option<String>,
    pub status: Option<String>,
    pub reference: Option<String>,
    pub notes: Option<String>,
}

impl PaymentPatch {
    fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.payment_method.is_none()
            && self.status.is_none()
            && self.reference.is_none()
            && self.notes.is_none()
    }
}

pub struct PaymentService {
    db: Arc<DatabaseConnection>,
    uploads_dir: PathBuf,
}

impl PaymentService {
    pub fn new(db: Arc<DatabaseConnection>, uploads_dir: impl Into<PathBuf>) -> Self {
        Self {
            db,
            uploads_dir: uploads_dir.into(),
        }
    }

    pub async fn list(&self) -> Result<Vec<payment::Model>, ServiceError> {
        Ok(payment::Entity::find().all(&*self.db).await?)
    }

    pub async fn get(&self, id: i64) -> Result<payment::Model, ServiceError> {
        payment::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("payment {}", id)))
    }

    pub async fn create(&self, input: NewPayment) -> Result<payment::Model, ServiceError> {
        let invoice_exists = invoice::Entity::find_by_id(input.invoice_id)
            .one(&*self.db)
            .await?;
        if invoice_exists.is_none() {
            return Err(ServiceError::ValidationError(format!(
                "invoice {} does not exist",
                input.invoice_id
            )));
        }

        let model = payment::ActiveModel {
            invoice_id: Set(input.invoice_id),
            amount: Set(input.amount),
            payment_method: Set(input.payment_method),
            status: Set(input.status.unwrap_or_else(|| "pending".to_string())),
            reference: Set(input.reference),
            notes: Set(input.notes),
            receipt_path: Set(None),
            paid_at: Set(Utc::now()),
            ..Default::default()
        };

        let created = model.insert(&*self.db).await?;
        tracing::info!(payment_id = created.id, invoice_id = created.invoice_id, "payment recorded");
        Ok(created)
    }

    pub async fn update(&self, id: i64, patch: PaymentPatch) -> Result<payment::Model, ServiceError> {
        let existing = self.get(id).await?;

        if patch.is_empty() {
            return Ok(existing);
        }

        let mut active: payment::ActiveModel = existing.into();
        if let Some(amount) = patch.amount {
            active.amount = Set(amount);
        }
        if let Some(payment_method) = patch.payment_method {
            active.payment_method = Set(Some(payment_method));
        }
        if let Some(status) = patch.status {
            active.status = Set(status);
        }
        if let Some(reference) = patch.reference {
            active.reference = Set(Some(reference));
        }
        if let Some(notes) = patch.notes {
            active.notes = Set(Some(notes));
        }

        Ok(active.update(&*self.db).await?)
    }

    /// Store an uploaded receipt file keyed by payment id and remember its
    /// path on the payment.
    pub async fn attach_receipt(
        &self,
        payment_id: i64,
        extension: &str,
        bytes: &[u8],
    ) -> Result<payment::Model, ServiceError> {
        let existing = self.get(payment_id).await?;

        tokio::fs::create_dir_all(&self.uploads_dir)
            .await
            .map_err(|e| ServiceError::InternalError(e.to_string()))?;
        let path = self
            .uploads_dir
            .join(format!("receipt_{}.{}", payment_id, extension));
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| ServiceError::InternalError(e.to_string()))?;

        let mut active: payment::ActiveModel = existing.into();
        active.receipt_path = Set(Some(path.to_string_lossy().into_owned()));
        let updated = active.update(&*self.db).await?;

        tracing::info!(payment_id, "receipt uploaded");
        Ok(updated)
    }

    /// Restricted delete: payments with generated receipts stay.
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let existing = self.get(id).await?;

        let receipts = receipt::Entity::find()
            .filter(receipt::Column::PaymentId.eq(id))
            .count(&*self.db)
            .await?;
        if receipts > 0 {
            return Err(ServiceError::ValidationError(format!(
                "cannot delete payment {}: dependent records exist",
                id
            )));
        }

        existing.delete(&*self.db).await?;
        Ok(())
    }
}
