use std::sync::Arc;

use axum::{
    routing::{get, post},
    Json, Router,
};
use sea_orm::DatabaseConnection;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use service::BuildingService;

pub mod buildings;
pub mod images;

#[derive(Clone)]
pub struct ServerState {
    pub service: Arc<BuildingService>,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router over one shared service instance
pub fn build_router(db: DatabaseConnection, cors: CorsLayer) -> Router {
    let state = ServerState { service: Arc::new(BuildingService::new(db)) };

    Router::new()
        .route("/health", get(health))
        .route(
            "/buildings",
            get(buildings::list_buildings).post(buildings::create_building),
        )
        .route(
            "/buildings/:id",
            get(buildings::get_building).delete(buildings::delete_building),
        )
        .route("/buildings/:id/approval", post(buildings::set_approval))
        .route("/images/:id", get(images::get_image))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
