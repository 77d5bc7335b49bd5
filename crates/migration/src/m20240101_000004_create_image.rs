//! Create `image` table with FK to `building`.
//!
//! Images are owned exclusively by their building and cascade on delete.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Image::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Image::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(big_integer(Image::BuildingId).not_null())
                    .col(string_len(Image::Name, 255).not_null())
                    .col(ColumnDef::new(Image::ContentType).string_len(128).null())
                    .col(big_integer(Image::Size).not_null())
                    .col(ColumnDef::new(Image::Bytes).binary().not_null())
                    .col(boolean(Image::PreviewImage).not_null().default(false))
                    .col(timestamp_with_time_zone(Image::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_image_building")
                            .from(Image::Table, Image::BuildingId)
                            .to(Building::Table, Building::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Image::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Image { Table, Id, BuildingId, Name, ContentType, Size, Bytes, PreviewImage, CreatedAt }

#[derive(DeriveIden)]
enum Building { Table, Id }
