//! Create `building` table with FK to `user`.
//!
//! `user_id` is nullable: listings submitted without a resolvable identity
//! have no persisted owner. Owner deletion detaches rather than removes.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Building::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Building::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(string_len(Building::Name, 255).not_null())
                    .col(string_len(Building::Location, 255).not_null())
                    .col(big_integer(Building::Price).not_null())
                    .col(boolean(Building::Approved).not_null().default(false))
                    .col(ColumnDef::new(Building::UserId).big_integer().null())
                    .col(ColumnDef::new(Building::PreviewImageId).big_integer().null())
                    .col(timestamp_with_time_zone(Building::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_building_user")
                            .from(Building::Table, Building::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Building::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Building { Table, Id, Name, Location, Price, Approved, UserId, PreviewImageId, CreatedAt }

#[derive(DeriveIden)]
enum User { Table, Id }
