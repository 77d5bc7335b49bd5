use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Building: index on owner
        manager
            .create_index(
                Index::create()
                    .name("idx_building_user")
                    .table(Building::Table)
                    .col(Building::UserId)
                    .to_owned(),
            )
            .await?;

        // Building: index on approval flag, the admin views filter by it
        manager
            .create_index(
                Index::create()
                    .name("idx_building_approved")
                    .table(Building::Table)
                    .col(Building::Approved)
                    .to_owned(),
            )
            .await?;

        // Image: index on owning building
        manager
            .create_index(
                Index::create()
                    .name("idx_image_building")
                    .table(Image::Table)
                    .col(Image::BuildingId)
                    .to_owned(),
            )
            .await?;

        // UserLog: index on user_id
        manager
            .create_index(
                Index::create()
                    .name("idx_user_log_user")
                    .table(UserLog::Table)
                    .col(UserLog::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_building_user").table(Building::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_building_approved").table(Building::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_image_building").table(Image::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_user_log_user").table(UserLog::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Building { Table, UserId, Approved }

#[derive(DeriveIden)]
enum Image { Table, BuildingId }

#[derive(DeriveIden)]
enum UserLog { Table, UserId }
