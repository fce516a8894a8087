use sea_orm_migration::prelude::*;

use crate::m20250301_000003_create_orders_table::Orders;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DeliveryNotes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DeliveryNotes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DeliveryNotes::OrderId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DeliveryNotes::PdfPath).string_len(200))
                    .col(
                        ColumnDef::new(DeliveryNotes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_delivery_notes_order")
                            .from(DeliveryNotes::Table, DeliveryNotes::OrderId)
                            .to(Orders::Table, Orders::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DeliveryNotes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum DeliveryNotes {
    Table,
    Id,
    OrderId,
    PdfPath,
    CreatedAt,
}
