//! Create `user_log` table with FK to `user`.
//!
//! Append-only audit trail; entries are ordered by id and never updated.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserLog::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserLog::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(big_integer(UserLog::UserId).not_null())
                    .col(text(UserLog::Entry).not_null())
                    .col(timestamp_with_time_zone(UserLog::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_log_user")
                            .from(UserLog::Table, UserLog::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(UserLog::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum UserLog { Table, Id, UserId, Entry, CreatedAt }

#[derive(DeriveIden)]
enum User { Table, Id }
