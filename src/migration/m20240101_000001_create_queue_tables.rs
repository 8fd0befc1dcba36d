use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OfficeHoursQueue::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OfficeHoursQueue::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OfficeHoursQueue::OwnerId).text().not_null())
                    .col(ColumnDef::new(OfficeHoursQueue::ChannelId).text().not_null())
                    .col(ColumnDef::new(OfficeHoursQueue::Status).text().not_null())
                    .col(
                        ColumnDef::new(OfficeHoursQueue::OpenedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_office_hours_queue_owner")
                    .table(OfficeHoursQueue::Table)
                    .col(OfficeHoursQueue::OwnerId)
                    .col(OfficeHoursQueue::ChannelId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OfficeHoursQueueEntry::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OfficeHoursQueueEntry::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(OfficeHoursQueueEntry::QueueId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OfficeHoursQueueEntry::UserId).text().not_null())
                    .col(ColumnDef::new(OfficeHoursQueueEntry::Question).text().null())
                    .col(
                        ColumnDef::new(OfficeHoursQueueEntry::PrivateEntry)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(OfficeHoursQueueEntry::Resolved).text().not_null())
                    .col(
                        ColumnDef::new(OfficeHoursQueueEntry::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_office_hours_queue_entry_queue")
                            .from(OfficeHoursQueueEntry::Table, OfficeHoursQueueEntry::QueueId)
                            .to(OfficeHoursQueue::Table, OfficeHoursQueue::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_office_hours_queue_entry_queue")
                    .table(OfficeHoursQueueEntry::Table)
                    .col(OfficeHoursQueueEntry::QueueId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OfficeHoursQueueEntry::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OfficeHoursQueue::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum OfficeHoursQueue {
    Table,
    Id,
    OwnerId,
    ChannelId,
    Status,
    OpenedAt,
}

#[derive(DeriveIden)]
enum OfficeHoursQueueEntry {
    Table,
    Id,
    QueueId,
    UserId,
    Question,
    PrivateEntry,
    Resolved,
    CreatedAt,
}
