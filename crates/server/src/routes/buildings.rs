use axum::extract::multipart::Field;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};

use models::{building, image};
use service::{BuildingDraft, BuildingFilter, UploadedFile};

use crate::errors::ApiError;
use crate::routes::ServerState;

/// Caller identity as resolved by the upstream auth layer, if any.
pub(crate) fn caller_username(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-username")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

#[derive(Serialize)]
pub struct ImageSummary {
    pub id: i64,
    pub name: String,
    pub content_type: Option<String>,
    pub size: i64,
    pub preview_image: bool,
}

impl From<image::Model> for ImageSummary {
    fn from(m: image::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            content_type: m.content_type,
            size: m.size,
            preview_image: m.preview_image,
        }
    }
}

#[derive(Serialize)]
pub struct BuildingResponse {
    #[serde(flatten)]
    pub building: building::Model,
    pub images: Vec<ImageSummary>,
}

/// List buildings matching the query criteria; no criteria lists everything.
pub async fn list_buildings(
    State(state): State<ServerState>,
    Query(filter): Query<BuildingFilter>,
) -> Result<Json<Vec<building::Model>>, ApiError> {
    Ok(Json(state.service.list_listings(&filter).await?))
}

/// Fetch one building together with its images.
pub async fn get_building(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Json<BuildingResponse>, ApiError> {
    match state.service.get_listing_with_images(id).await? {
        Some((building, images)) => Ok(Json(BuildingResponse {
            building,
            images: images.into_iter().map(ImageSummary::from).collect(),
        })),
        None => Err(ApiError::not_found(format!("building not found with id: {}", id))),
    }
}

/// Create a listing from a multipart form: `name`, `location`, `price` text
/// fields plus the optional `facade`, `entrance`, `interior` file parts.
pub async fn create_building(
    State(state): State<ServerState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<building::Model>), ApiError> {
    let username = caller_username(&headers);

    let mut name = None;
    let mut location = None;
    let mut price = None;
    let mut facade = None;
    let mut entrance = None;
    let mut interior = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?
    {
        let Some(field_name) = field.name().map(|s| s.to_string()) else { continue };
        match field_name.as_str() {
            "name" => name = Some(text_field(field).await?),
            "location" => location = Some(text_field(field).await?),
            "price" => {
                let raw = text_field(field).await?;
                price = Some(
                    raw.trim()
                        .parse::<i64>()
                        .map_err(|_| ApiError::bad_request("price must be an integer"))?,
                );
            }
            "facade" => facade = Some(file_field(field).await?),
            "entrance" => entrance = Some(file_field(field).await?),
            "interior" => interior = Some(file_field(field).await?),
            _ => {}
        }
    }

    let draft = BuildingDraft {
        name: name.ok_or_else(|| ApiError::bad_request("name is required"))?,
        location: location.ok_or_else(|| ApiError::bad_request("location is required"))?,
        price: price.ok_or_else(|| ApiError::bad_request("price is required"))?,
    };

    let created = state
        .service
        .create_listing(username.as_deref(), draft, facade, entrance, interior)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[derive(Deserialize)]
pub struct ApprovalInput {
    pub approved: bool,
}

/// Approve or reject a listing. 404 when the building does not exist.
pub async fn set_approval(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(input): Json<ApprovalInput>,
) -> Result<StatusCode, ApiError> {
    let username = caller_username(&headers);
    let admin = state.service.resolve_current_user(username.as_deref()).await?;
    state.service.set_approval_status(id, input.approved, &admin).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a listing; idempotent, always 204.
pub async fn delete_building(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.service.remove_listing(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn text_field(field: Field<'_>) -> Result<String, ApiError> {
    field.text().await.map_err(|e| ApiError::bad_request(e.to_string()))
}

async fn file_field(field: Field<'_>) -> Result<UploadedFile, ApiError> {
    let name = field
        .file_name()
        .or(field.name())
        .unwrap_or("file")
        .to_string();
    let content_type = field.content_type().map(|s| s.to_string());
    let bytes = field
        .bytes()
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    Ok(UploadedFile::new(name, content_type, bytes.to_vec()))
}
