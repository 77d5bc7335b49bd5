use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::{building, user_log};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub username: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Building,
    UserLog,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Building => Entity::has_many(building::Entity).into(),
            Relation::UserLog => Entity::has_many(user_log::Entity).into(),
        }
    }
}

impl Related<building::Entity> for Entity {
    fn to() -> RelationDef { Relation::Building.def() }
}

impl Related<user_log::Entity> for Entity {
    fn to() -> RelationDef { Relation::UserLog.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// True for the placeholder identity that was never stored.
    pub fn is_anonymous(&self) -> bool { self.id == 0 }
}

/// Placeholder identity for requests without a resolvable user.
/// Never persisted; audit appends against it have nowhere to land.
pub fn anonymous() -> Model {
    Model { id: 0, username: String::new(), created_at: Utc::now().into() }
}

pub async fn create<C: ConnectionTrait>(conn: &C, username: &str) -> Result<Model, errors::ModelError> {
    if username.trim().is_empty() {
        return Err(errors::ModelError::Validation("username required".into()));
    }
    let am = ActiveModel {
        username: Set(username.to_string()),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    am.insert(conn).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find_by_username<C: ConnectionTrait>(conn: &C, username: &str) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::Username.eq(username))
        .one(conn)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn hard_delete<C: ConnectionTrait>(conn: &C, id: i64) -> Result<(), errors::ModelError> {
    Entity::delete_by_id(id).exec(conn).await.map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(())
}
