use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DirectMessages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DirectMessages::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DirectMessages::SenderEmail).string().not_null())
                    .col(
                        ColumnDef::new(DirectMessages::ReceiverEmail)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DirectMessages::Content).text().not_null())
                    .col(
                        ColumnDef::new(DirectMessages::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(DirectMessages::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_direct_messages_receiver")
                    .table(DirectMessages::Table)
                    .col(DirectMessages::ReceiverEmail)
                    .col(DirectMessages::IsRead)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DirectMessages::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DirectMessages {
    Table,
    Id,
    SenderEmail,
    ReceiverEmail,
    Content,
    CreatedAt,
    IsRead,
}
