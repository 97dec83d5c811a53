use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MailOutbox::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(MailOutbox::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(MailOutbox::Kind).string_len(64).not_null())
                    .col(ColumnDef::new(MailOutbox::Recipient).string_len(254).not_null())
                    .col(ColumnDef::new(MailOutbox::Payload).json_binary().not_null())
                    .col(
                        ColumnDef::new(MailOutbox::IdempotencyKey)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(MailOutbox::Attempts)
                            .small_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MailOutbox::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(MailOutbox::SentAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Relay scans unsent mail oldest first.
        manager
            .create_index(
                Index::create()
                    .table(MailOutbox::Table)
                    .col(MailOutbox::SentAt)
                    .col(MailOutbox::CreatedAt)
                    .name("idx_mail_outbox_pending")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MailOutbox::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum MailOutbox {
    Table,
    Id,
    Kind,
    Recipient,
    Payload,
    IdempotencyKey,
    Attempts,
    CreatedAt,
    SentAt,
}
