pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_auth_tables;
mod m20250301_000002_create_stock_items_table;
mod m20250301_000003_create_orders_table;
mod m20250301_000004_create_invoices_table;
mod m20250301_000005_create_payments_table;
mod m20250301_000006_create_receipts_table;
mod m20250301_000007_create_delivery_notes_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_auth_tables::Migration),
            Box::new(m20250301_000002_create_stock_items_table::Migration),
            Box::new(m20250301_000003_create_orders_table::Migration),
            Box::new(m20250301_000004_create_invoices_table::Migration),
            Box::new(m20250301_000005_create_payments_table::Migration),
            Box::new(m20250301_000006_create_receipts_table::Migration),
            Box::new(m20250301_000007_create_delivery_notes_table::Migration),
        ]
    }
}
