use sea_orm::{entity::prelude::*, Condition, ConnectionTrait, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::{image, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "building")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub location: String,
    pub price: i64,
    pub approved: bool,
    pub user_id: Option<i64>,
    pub preview_image_id: Option<i64>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
    Image,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
            Relation::Image => Entity::has_many(image::Entity).into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl Related<image::Entity> for Entity {
    fn to() -> RelationDef { Relation::Image.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Insert a new listing. Approval always starts out pending.
pub async fn create<C: ConnectionTrait>(
    conn: &C,
    name: &str,
    location: &str,
    price: i64,
    user_id: Option<i64>,
) -> Result<Model, errors::ModelError> {
    let am = ActiveModel {
        name: Set(name.to_string()),
        location: Set(location.to_string()),
        price: Set(price),
        approved: Set(false),
        user_id: Set(user_id),
        preview_image_id: Set(None),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    am.insert(conn).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find_by_id<C: ConnectionTrait>(conn: &C, id: i64) -> Result<Option<Model>, errors::ModelError> {
    Entity::find_by_id(id).one(conn).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// All listings matching a prebuilt conjunction of predicates.
/// An empty condition returns every row, in storage order.
pub async fn find_filtered<C: ConnectionTrait>(conn: &C, condition: Condition) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .filter(condition)
        .all(conn)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Delete by id; silently a no-op when the row does not exist.
/// Attached images go with it via the FK cascade.
pub async fn delete_by_id<C: ConnectionTrait>(conn: &C, id: i64) -> Result<(), errors::ModelError> {
    Entity::delete_by_id(id).exec(conn).await.map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(())
}

pub async fn set_preview_image<C: ConnectionTrait>(conn: &C, id: i64, image_id: i64) -> Result<(), errors::ModelError> {
    let mut found: ActiveModel = Entity::find_by_id(id)
        .one(conn)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?
        .ok_or_else(|| errors::ModelError::Validation("building not found".into()))?
        .into();
    found.preview_image_id = Set(Some(image_id));
    found.update(conn).await.map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(())
}

/// Flip the approval flag. `None` when no such building exists; the caller
/// decides whether that is an error.
pub async fn set_approved<C: ConnectionTrait>(conn: &C, id: i64, approved: bool) -> Result<Option<Model>, errors::ModelError> {
    let Some(found) = Entity::find_by_id(id)
        .one(conn)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?
    else {
        return Ok(None);
    };
    let mut am: ActiveModel = found.into();
    am.approved = Set(approved);
    let updated = am.update(conn).await.map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(Some(updated))
}
