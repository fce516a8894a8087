use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StockItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StockItems::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StockItems::ItemName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(StockItems::Category).string_len(100))
                    .col(ColumnDef::new(StockItems::UnitPrice).decimal_len(12, 2))
                    .col(ColumnDef::new(StockItems::Quantity).big_integer().not_null())
                    .col(
                        ColumnDef::new(StockItems::LastUpdated)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StockItems::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum StockItems {
    Table,
    Id,
    ItemName,
    Category,
    UnitPrice,
    Quantity,
    LastUpdated,
}
