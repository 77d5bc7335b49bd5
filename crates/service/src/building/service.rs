use std::sync::Arc;

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::building::filter::BuildingFilter;
use crate::building::repository::{
    BuildingRepository, SeaOrmBuildingRepository, SeaOrmUserRepository, UserRepository,
};
use crate::errors::ServiceError;
use crate::upload::UploadedFile;
use models::{building, image, user, user_log};

/// Descriptive listing fields as submitted by the owner.
#[derive(Clone, Debug, Deserialize)]
pub struct BuildingDraft {
    pub name: String,
    pub location: String,
    pub price: i64,
}

/// Application service for rental-premises listings.
///
/// Each public operation runs inside one transaction; a transaction dropped
/// on an early return rolls back, so partial effects never become visible.
pub struct BuildingService<B: BuildingRepository = SeaOrmBuildingRepository, U: UserRepository = SeaOrmUserRepository> {
    db: DatabaseConnection,
    buildings: Arc<B>,
    users: Arc<U>,
}

impl BuildingService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            buildings: Arc::new(SeaOrmBuildingRepository),
            users: Arc::new(SeaOrmUserRepository),
        }
    }
}

impl<B: BuildingRepository, U: UserRepository> BuildingService<B, U> {
    pub fn with_repositories(db: DatabaseConnection, buildings: Arc<B>, users: Arc<U>) -> Self {
        Self { db, buildings, users }
    }

    async fn begin(&self) -> Result<DatabaseTransaction, ServiceError> {
        self.db.begin().await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn commit(&self, txn: DatabaseTransaction) -> Result<(), ServiceError> {
        txn.commit().await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    /// Map an optional caller identity to a user record. Fail-open: no
    /// identity or an unknown username yields the anonymous placeholder,
    /// never an error.
    pub async fn resolve_current_user(&self, username: Option<&str>) -> Result<user::Model, ServiceError> {
        let txn = self.begin().await?;
        let resolved = self.resolve_on(&txn, username).await?;
        self.commit(txn).await?;
        Ok(resolved)
    }

    async fn resolve_on(&self, txn: &DatabaseTransaction, username: Option<&str>) -> Result<user::Model, ServiceError> {
        let Some(name) = username else {
            info!("no caller identity, acting as anonymous");
            return Ok(user::anonymous());
        };
        match self.users.find_by_username(txn, name).await? {
            Some(found) => {
                info!(username = %name, "user was found");
                Ok(found)
            }
            None => {
                info!(username = %name, "user not found, acting as anonymous");
                Ok(user::anonymous())
            }
        }
    }

    /// Create a listing owned by the resolved caller, attaching every
    /// nonzero-sized upload as an image. The facade photo alone is flagged
    /// as preview, and the first attached image becomes the preview pointer;
    /// with no attachments the pointer stays unset.
    #[instrument(skip_all, fields(name = %draft.name))]
    pub async fn create_listing(
        &self,
        username: Option<&str>,
        draft: BuildingDraft,
        facade: Option<UploadedFile>,
        entrance: Option<UploadedFile>,
        interior: Option<UploadedFile>,
    ) -> Result<building::Model, ServiceError> {
        let txn = self.begin().await?;

        let acting = self.resolve_on(&txn, username).await?;
        let owner_id = (!acting.is_anonymous()).then_some(acting.id);
        let saved = self.buildings.save_new(&txn, &draft, owner_id).await?;
        info!(name = %saved.name, owner = %acting.username, "saving building");

        let mut first_image_id = None;
        for (file, preview) in [(facade, true), (entrance, false), (interior, false)] {
            let Some(file) = file else { continue };
            if file.is_empty() {
                continue;
            }
            let attached = self.buildings.attach_image(&txn, saved.id, &file, preview).await?;
            first_image_id.get_or_insert(attached.id);
        }

        if let Some(owner_id) = owner_id {
            self.users
                .append_log(&txn, owner_id, &format!("Создал помещение: {}", saved.name))
                .await?;
        }

        if let Some(image_id) = first_image_id {
            self.buildings.set_preview_image(&txn, saved.id, image_id).await?;
        }

        let created = self
            .buildings
            .find_by_id(&txn, saved.id)
            .await?
            .ok_or_else(|| ServiceError::Db("created building vanished before commit".into()))?;
        self.commit(txn).await?;
        Ok(created)
    }

    /// Delete a listing and, via cascade, its images. Unknown ids are a
    /// silent no-op.
    pub async fn remove_listing(&self, id: i64) -> Result<(), ServiceError> {
        let txn = self.begin().await?;
        self.buildings.delete_by_id(&txn, id).await?;
        self.commit(txn).await?;
        info!(id, "deleted building");
        Ok(())
    }

    /// Fail-open read: `None` for a missing id.
    pub async fn get_listing(&self, id: i64) -> Result<Option<building::Model>, ServiceError> {
        let txn = self.begin().await?;
        let found = self.buildings.find_by_id(&txn, id).await?;
        self.commit(txn).await?;
        Ok(found)
    }

    /// The aggregate view: listing plus its images in attachment order.
    pub async fn get_listing_with_images(&self, id: i64) -> Result<Option<(building::Model, Vec<image::Model>)>, ServiceError> {
        let txn = self.begin().await?;
        let Some(found) = self.buildings.find_by_id(&txn, id).await? else {
            self.commit(txn).await?;
            return Ok(None);
        };
        let images = self.buildings.images_of(&txn, found.id).await?;
        self.commit(txn).await?;
        Ok(Some((found, images)))
    }

    pub async fn get_image(&self, id: i64) -> Result<Option<image::Model>, ServiceError> {
        let txn = self.begin().await?;
        let found = self.buildings.image_by_id(&txn, id).await?;
        self.commit(txn).await?;
        Ok(found)
    }

    /// All listings matching the supplied criteria, storage order.
    pub async fn list_listings(&self, filter: &BuildingFilter) -> Result<Vec<building::Model>, ServiceError> {
        let txn = self.begin().await?;
        let found = self.buildings.list(&txn, filter).await?;
        self.commit(txn).await?;
        Ok(found)
    }

    /// Approve or reject a listing and record the decision on the acting
    /// admin's audit trail. This is the one fail-loud path: a missing
    /// building is a caller error carrying the requested id.
    #[instrument(skip(self, admin))]
    pub async fn set_approval_status(&self, building_id: i64, approved: bool, admin: &user::Model) -> Result<(), ServiceError> {
        let txn = self.begin().await?;
        let Some(_) = self.buildings.set_approved(&txn, building_id, approved).await? else {
            // txn dropped here, nothing persisted
            return Err(ServiceError::building_not_found(building_id));
        };
        if !admin.is_anonymous() {
            let entry = if approved {
                format!("Одобрил помещение, id = {}", building_id)
            } else {
                format!("Не одобрил помещение, id = {}", building_id)
            };
            self.users.append_log(&txn, admin.id, &entry).await?;
        }
        self.commit(txn).await?;
        info!(building_id, approved, "changed building status");
        Ok(())
    }

    /// Ordered audit trail of a user, oldest first.
    pub async fn user_audit_log(&self, user_id: i64) -> Result<Vec<user_log::Model>, ServiceError> {
        let txn = self.begin().await?;
        let entries = self.users.audit_log(&txn, user_id).await?;
        self.commit(txn).await?;
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use uuid::Uuid;

    fn draft(name: &str) -> BuildingDraft {
        BuildingDraft { name: name.to_string(), location: "Springfield".into(), price: 1000 }
    }

    fn upload(name: &str, payload: &[u8]) -> UploadedFile {
        UploadedFile::new(name, Some("image/jpeg".into()), payload.to_vec())
    }

    async fn stored_user(db: &DatabaseConnection, prefix: &str) -> anyhow::Result<user::Model> {
        Ok(user::create(db, &format!("{}_{}", prefix, Uuid::new_v4())).await?)
    }

    #[tokio::test]
    async fn resolve_without_identity_is_anonymous() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };
        let svc = BuildingService::new(db);

        let resolved = svc.resolve_current_user(None).await?;
        assert!(resolved.is_anonymous());
        Ok(())
    }

    #[tokio::test]
    async fn resolve_unknown_username_is_anonymous_not_an_error() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };
        let svc = BuildingService::new(db);

        let ghost = format!("ghost_{}", Uuid::new_v4());
        let resolved = svc.resolve_current_user(Some(&ghost)).await?;
        assert!(resolved.is_anonymous());
        Ok(())
    }

    #[tokio::test]
    async fn resolve_known_username_returns_stored_user() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };
        let owner = stored_user(&db, "owner").await?;
        let svc = BuildingService::new(db.clone());

        let resolved = svc.resolve_current_user(Some(&owner.username)).await?;
        assert_eq!(resolved.id, owner.id);
        assert!(!resolved.is_anonymous());

        user::hard_delete(&db, owner.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn create_with_facade_only_attaches_one_preview_image() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };
        let owner = stored_user(&db, "owner").await?;
        let svc = BuildingService::new(db.clone());

        let name = format!("Loft_{}", Uuid::new_v4());
        let created = svc
            .create_listing(
                Some(&owner.username),
                draft(&name),
                Some(upload("facade", b"front")),
                Some(upload("entrance", b"")),
                None,
            )
            .await?;

        let images = image::for_building(&db, created.id).await?;
        assert_eq!(images.len(), 1);
        assert!(images[0].preview_image);
        assert_eq!(images[0].name, "facade");
        assert_eq!(images[0].size, 5);
        assert_eq!(created.preview_image_id, Some(images[0].id));
        assert_eq!(created.user_id, Some(owner.id));
        assert!(!created.approved);

        let trail = svc.user_audit_log(owner.id).await?;
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].entry, format!("Создал помещение: {}", name));

        svc.remove_listing(created.id).await?;
        user::hard_delete(&db, owner.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn create_attaches_images_in_facade_entrance_interior_order() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };
        let owner = stored_user(&db, "owner").await?;
        let svc = BuildingService::new(db.clone());

        let created = svc
            .create_listing(
                Some(&owner.username),
                draft(&format!("Tower_{}", Uuid::new_v4())),
                Some(upload("facade", b"front")),
                Some(upload("entrance", b"door")),
                Some(upload("interior", b"rooms")),
            )
            .await?;

        let images = image::for_building(&db, created.id).await?;
        let names: Vec<&str> = images.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["facade", "entrance", "interior"]);
        let previews: Vec<bool> = images.iter().map(|i| i.preview_image).collect();
        assert_eq!(previews, [true, false, false]);
        assert_eq!(created.preview_image_id, Some(images[0].id));

        svc.remove_listing(created.id).await?;
        user::hard_delete(&db, owner.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn create_with_all_empty_files_attaches_nothing() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };
        let owner = stored_user(&db, "owner").await?;
        let svc = BuildingService::new(db.clone());

        let created = svc
            .create_listing(
                Some(&owner.username),
                draft(&format!("Bare_{}", Uuid::new_v4())),
                Some(upload("facade", b"")),
                Some(upload("entrance", b"")),
                Some(upload("interior", b"")),
            )
            .await?;

        let images = image::for_building(&db, created.id).await?;
        assert!(images.is_empty());
        assert!(created.preview_image_id.is_none());

        svc.remove_listing(created.id).await?;
        user::hard_delete(&db, owner.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn create_by_anonymous_caller_has_no_owner_and_no_trail() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };
        let svc = BuildingService::new(db.clone());

        let created = svc
            .create_listing(None, draft(&format!("Anon_{}", Uuid::new_v4())), Some(upload("facade", b"x")), None, None)
            .await?;
        assert!(created.user_id.is_none());

        svc.remove_listing(created.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn list_filters_by_exact_name_only() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };
        let svc = BuildingService::new(db.clone());

        let name_a = format!("Loft_{}", Uuid::new_v4());
        let name_b = format!("Villa_{}", Uuid::new_v4());
        let a = svc.create_listing(None, draft(&name_a), None, None, None).await?;
        let b = svc.create_listing(None, draft(&name_b), None, None, None).await?;

        let only_a = svc
            .list_listings(&BuildingFilter { name: Some(name_a.clone()), ..Default::default() })
            .await?;
        assert_eq!(only_a.len(), 1);
        assert_eq!(only_a[0].id, a.id);

        // empty string means "no name criterion", not "name == ''"
        let unfiltered = svc
            .list_listings(&BuildingFilter { name: Some(String::new()), ..Default::default() })
            .await?;
        let ids: Vec<i64> = unfiltered.iter().map(|m| m.id).collect();
        assert!(ids.contains(&a.id) && ids.contains(&b.id));

        svc.remove_listing(a.id).await?;
        svc.remove_listing(b.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn list_price_bound_is_inclusive() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };
        let svc = BuildingService::new(db.clone());

        let name = format!("Priced_{}", Uuid::new_v4());
        let cheap = svc
            .create_listing(None, BuildingDraft { name: name.clone(), location: "Springfield".into(), price: 900 }, None, None, None)
            .await?;
        let expensive = svc
            .create_listing(None, BuildingDraft { name: name.clone(), location: "Springfield".into(), price: 901 }, None, None, None)
            .await?;

        let within = svc
            .list_listings(&BuildingFilter { name: Some(name.clone()), max_price: Some(900), ..Default::default() })
            .await?;
        assert_eq!(within.len(), 1);
        assert_eq!(within[0].id, cheap.id);

        svc.remove_listing(cheap.id).await?;
        svc.remove_listing(expensive.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn list_without_criteria_returns_everything() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };
        let svc = BuildingService::new(db.clone());

        let created = svc.create_listing(None, draft(&format!("All_{}", Uuid::new_v4())), None, None, None).await?;
        let all = svc.list_listings(&BuildingFilter::default()).await?;
        assert!(all.iter().any(|m| m.id == created.id));

        svc.remove_listing(created.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn approving_missing_building_fails_and_leaves_admin_log_untouched() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };
        let admin = stored_user(&db, "admin").await?;
        let svc = BuildingService::new(db.clone());

        let err = svc.set_approval_status(i64::MAX, true, &admin).await.unwrap_err();
        match err {
            ServiceError::NotFound(msg) => assert!(msg.contains(&i64::MAX.to_string())),
            other => panic!("expected NotFound, got {other:?}"),
        }
        let trail = svc.user_audit_log(admin.id).await?;
        assert!(trail.is_empty());

        user::hard_delete(&db, admin.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn rejecting_a_listing_records_the_decision() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };
        let admin = stored_user(&db, "admin").await?;
        let svc = BuildingService::new(db.clone());

        let created = svc.create_listing(None, draft(&format!("Reject_{}", Uuid::new_v4())), None, None, None).await?;
        svc.set_approval_status(created.id, false, &admin).await?;

        let reloaded = svc.get_listing(created.id).await?.unwrap();
        assert!(!reloaded.approved);
        let trail = svc.user_audit_log(admin.id).await?;
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].entry, format!("Не одобрил помещение, id = {}", created.id));

        svc.remove_listing(created.id).await?;
        user::hard_delete(&db, admin.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn approving_a_listing_records_the_decision() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };
        let admin = stored_user(&db, "admin").await?;
        let svc = BuildingService::new(db.clone());

        let created = svc.create_listing(None, draft(&format!("Approve_{}", Uuid::new_v4())), None, None, None).await?;
        svc.set_approval_status(created.id, true, &admin).await?;

        let reloaded = svc.get_listing(created.id).await?.unwrap();
        assert!(reloaded.approved);
        let trail = svc.user_audit_log(admin.id).await?;
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].entry, format!("Одобрил помещение, id = {}", created.id));

        svc.remove_listing(created.id).await?;
        user::hard_delete(&db, admin.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn removing_missing_listing_is_a_silent_noop() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };
        let svc = BuildingService::new(db.clone());

        let keeper = svc.create_listing(None, draft(&format!("Keep_{}", Uuid::new_v4())), None, None, None).await?;
        svc.remove_listing(i64::MAX).await?;
        assert!(svc.get_listing(keeper.id).await?.is_some());

        svc.remove_listing(keeper.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn get_listing_is_fail_open() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };
        let svc = BuildingService::new(db.clone());

        assert!(svc.get_listing(i64::MAX).await?.is_none());
        assert!(svc.get_listing_with_images(i64::MAX).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn removing_listing_cascades_to_images() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };
        let svc = BuildingService::new(db.clone());

        let created = svc
            .create_listing(None, draft(&format!("Gone_{}", Uuid::new_v4())), Some(upload("facade", b"x")), None, None)
            .await?;
        let (_, images) = svc.get_listing_with_images(created.id).await?.unwrap();
        assert_eq!(images.len(), 1);
        let image_id = images[0].id;

        svc.remove_listing(created.id).await?;
        assert!(svc.get_listing(created.id).await?.is_none());
        assert!(svc.get_image(image_id).await?.is_none());
        Ok(())
    }
}
