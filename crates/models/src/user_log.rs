use sea_orm::{entity::prelude::*, ConnectionTrait, QueryOrder, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::user;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub entry: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Append one audit entry. Entries are never updated or deleted individually.
pub async fn append<C: ConnectionTrait>(conn: &C, user_id: i64, entry: &str) -> Result<Model, errors::ModelError> {
    let am = ActiveModel {
        user_id: Set(user_id),
        entry: Set(entry.to_string()),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    am.insert(conn).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Full audit trail for a user, in append order.
pub async fn for_user<C: ConnectionTrait>(conn: &C, user_id: i64) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::UserId.eq(user_id))
        .order_by_asc(Column::Id)
        .all(conn)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}
