use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};

use crate::errors::ApiError;
use crate::routes::ServerState;

/// Serve one image's raw bytes under its declared content type.
pub async fn get_image(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    match state.service.get_image(id).await? {
        Some(img) => {
            let mut headers = HeaderMap::new();
            if let Some(ct) = img.content_type.as_deref() {
                if let Ok(value) = HeaderValue::from_str(ct) {
                    headers.insert(header::CONTENT_TYPE, value);
                }
            }
            Ok((headers, img.bytes).into_response())
        }
        None => Err(ApiError::not_found(format!("image not found with id: {}", id))),
    }
}
