use async_trait::async_trait;
use sea_orm::DatabaseTransaction;

use crate::building::filter::BuildingFilter;
use crate::building::service::BuildingDraft;
use crate::errors::ServiceError;
use crate::upload::UploadedFile;
use models::{building, image, user, user_log};

/// Storage seam for the building aggregate. Every method runs on the
/// caller's transaction so multi-step operations commit or roll back as one.
#[async_trait]
pub trait BuildingRepository: Send + Sync {
    async fn save_new(&self, txn: &DatabaseTransaction, draft: &BuildingDraft, user_id: Option<i64>) -> Result<building::Model, ServiceError>;
    async fn find_by_id(&self, txn: &DatabaseTransaction, id: i64) -> Result<Option<building::Model>, ServiceError>;
    async fn delete_by_id(&self, txn: &DatabaseTransaction, id: i64) -> Result<(), ServiceError>;
    async fn list(&self, txn: &DatabaseTransaction, filter: &BuildingFilter) -> Result<Vec<building::Model>, ServiceError>;
    async fn attach_image(&self, txn: &DatabaseTransaction, building_id: i64, file: &UploadedFile, preview: bool) -> Result<image::Model, ServiceError>;
    async fn images_of(&self, txn: &DatabaseTransaction, building_id: i64) -> Result<Vec<image::Model>, ServiceError>;
    async fn image_by_id(&self, txn: &DatabaseTransaction, id: i64) -> Result<Option<image::Model>, ServiceError>;
    async fn set_preview_image(&self, txn: &DatabaseTransaction, id: i64, image_id: i64) -> Result<(), ServiceError>;
    /// `None` when the building does not exist.
    async fn set_approved(&self, txn: &DatabaseTransaction, id: i64, approved: bool) -> Result<Option<building::Model>, ServiceError>;
}

/// Storage seam for the user aggregate and its audit trail.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_username(&self, txn: &DatabaseTransaction, username: &str) -> Result<Option<user::Model>, ServiceError>;
    async fn append_log(&self, txn: &DatabaseTransaction, user_id: i64, entry: &str) -> Result<(), ServiceError>;
    async fn audit_log(&self, txn: &DatabaseTransaction, user_id: i64) -> Result<Vec<user_log::Model>, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmBuildingRepository;

#[async_trait]
impl BuildingRepository for SeaOrmBuildingRepository {
    async fn save_new(&self, txn: &DatabaseTransaction, draft: &BuildingDraft, user_id: Option<i64>) -> Result<building::Model, ServiceError> {
        Ok(building::create(txn, &draft.name, &draft.location, draft.price, user_id).await?)
    }

    async fn find_by_id(&self, txn: &DatabaseTransaction, id: i64) -> Result<Option<building::Model>, ServiceError> {
        Ok(building::find_by_id(txn, id).await?)
    }

    async fn delete_by_id(&self, txn: &DatabaseTransaction, id: i64) -> Result<(), ServiceError> {
        Ok(building::delete_by_id(txn, id).await?)
    }

    async fn list(&self, txn: &DatabaseTransaction, filter: &BuildingFilter) -> Result<Vec<building::Model>, ServiceError> {
        Ok(building::find_filtered(txn, filter.to_condition()).await?)
    }

    async fn attach_image(&self, txn: &DatabaseTransaction, building_id: i64, file: &UploadedFile, preview: bool) -> Result<image::Model, ServiceError> {
        Ok(image::create(
            txn,
            building_id,
            &file.name,
            file.content_type.as_deref(),
            file.size,
            file.bytes.clone(),
            preview,
        )
        .await?)
    }

    async fn images_of(&self, txn: &DatabaseTransaction, building_id: i64) -> Result<Vec<image::Model>, ServiceError> {
        Ok(image::for_building(txn, building_id).await?)
    }

    async fn image_by_id(&self, txn: &DatabaseTransaction, id: i64) -> Result<Option<image::Model>, ServiceError> {
        Ok(image::find_by_id(txn, id).await?)
    }

    async fn set_preview_image(&self, txn: &DatabaseTransaction, id: i64, image_id: i64) -> Result<(), ServiceError> {
        Ok(building::set_preview_image(txn, id, image_id).await?)
    }

    async fn set_approved(&self, txn: &DatabaseTransaction, id: i64, approved: bool) -> Result<Option<building::Model>, ServiceError> {
        Ok(building::set_approved(txn, id, approved).await?)
    }
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmUserRepository;

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_username(&self, txn: &DatabaseTransaction, username: &str) -> Result<Option<user::Model>, ServiceError> {
        Ok(user::find_by_username(txn, username).await?)
    }

    async fn append_log(&self, txn: &DatabaseTransaction, user_id: i64, entry: &str) -> Result<(), ServiceError> {
        user_log::append(txn, user_id, entry).await?;
        Ok(())
    }

    async fn audit_log(&self, txn: &DatabaseTransaction, user_id: i64) -> Result<Vec<user_log::Model>, ServiceError> {
        Ok(user_log::for_user(txn, user_id).await?)
    }
}
