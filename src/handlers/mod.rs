pub mod auth;
pub mod common;
pub mod delivery_notes;
pub mod invoices;
pub mod orders;
pub mod payments;
pub mod receipts;
pub mod stock;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::services::delivery_notes::DeliveryNoteService;
use crate::services::documents::DocumentService;
use crate::services::invoices::InvoiceService;
use crate::services::orders::OrderService;
use crate::services::payments::PaymentService;
use crate::services::receipts::ReceiptService;
use crate::services::stock::StockService;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub stock: Arc<StockService>,
    pub orders: Arc<OrderService>,
    pub invoices: Arc<InvoiceService>,
    pub payments: Arc<PaymentService>,
    pub receipts: Arc<ReceiptService>,
    pub delivery_notes: Arc<DeliveryNoteService>,
    pub documents: Arc<DocumentService>,
}

impl AppServices {
    pub fn new(db: Arc<DatabaseConnection>, config: &AppConfig) -> Self {
        let documents = Arc::new(DocumentService::new(&config.documents_dir));

        Self {
            stock: Arc::new(StockService::new(db.clone())),
            orders: Arc::new(OrderService::new(db.clone())),
            invoices: Arc::new(InvoiceService::new(db.clone(), documents.clone())),
            payments: Arc::new(PaymentService::new(db.clone(), &config.uploads_dir)),
            receipts: Arc::new(ReceiptService::new(db.clone(), documents.clone())),
            delivery_notes: Arc::new(DeliveryNoteService::new(db, documents.clone())),
            documents,
        }
    }
}
