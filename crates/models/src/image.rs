use sea_orm::{entity::prelude::*, ConnectionTrait, QueryOrder, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::building;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "image")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub building_id: i64,
    pub name: String,
    pub content_type: Option<String>,
    pub size: i64,
    #[serde(skip_serializing)]
    pub bytes: Vec<u8>,
    pub preview_image: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Building,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Building => Entity::belongs_to(building::Entity)
                .from(Column::BuildingId)
                .to(building::Column::Id)
                .into(),
        }
    }
}

impl Related<building::Entity> for Entity {
    fn to() -> RelationDef { Relation::Building.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Attach an image to a building. Images are immutable once created;
/// they disappear only with their owning building.
pub async fn create<C: ConnectionTrait>(
    conn: &C,
    building_id: i64,
    name: &str,
    content_type: Option<&str>,
    size: i64,
    bytes: Vec<u8>,
    preview_image: bool,
) -> Result<Model, errors::ModelError> {
    let am = ActiveModel {
        building_id: Set(building_id),
        name: Set(name.to_string()),
        content_type: Set(content_type.map(|s| s.to_string())),
        size: Set(size),
        bytes: Set(bytes),
        preview_image: Set(preview_image),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    am.insert(conn).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find_by_id<C: ConnectionTrait>(conn: &C, id: i64) -> Result<Option<Model>, errors::ModelError> {
    Entity::find_by_id(id).one(conn).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Images of one building, in attachment order.
pub async fn for_building<C: ConnectionTrait>(conn: &C, building_id: i64) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::BuildingId.eq(building_id))
        .order_by_asc(Column::Id)
        .all(conn)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}
