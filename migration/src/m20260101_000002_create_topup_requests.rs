use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TopupRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TopupRequests::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TopupRequests::Tid)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(TopupRequests::Email).string().not_null())
                    .col(ColumnDef::new(TopupRequests::Amount).big_integer().not_null())
                    .col(ColumnDef::new(TopupRequests::Price).big_integer().not_null())
                    .col(ColumnDef::new(TopupRequests::ReceiptUrl).string())
                    .col(
                        ColumnDef::new(TopupRequests::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(TopupRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_topup_requests_email")
                    .table(TopupRequests::Table)
                    .col(TopupRequests::Email)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_topup_requests_status")
                    .table(TopupRequests::Table)
                    .col(TopupRequests::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TopupRequests::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TopupRequests {
    Table,
    Id,
    Tid,
    Email,
    Amount,
    Price,
    ReceiptUrl,
    Status,
    CreatedAt,
}
