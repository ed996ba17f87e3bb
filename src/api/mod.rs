pub mod records;
pub mod zones;

use axum::{
    Extension, Router,
    routing::{delete, get, post},
};
use tower_http::cors::CorsLayer;

use crate::SharedState;

pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/api/zones", get(zones::list_zones).post(zones::create_zone))
        .route(
            "/api/zones/{id}",
            get(zones::get_zone)
                .put(zones::update_zone)
                .delete(zones::delete_zone),
        )
        .route("/api/zones/{id}/records", post(records::create_record))
        .route(
            "/api/zones/{id}/records/{record_id}",
            delete(records::delete_record),
        )
        .route("/api/resync", post(zones::resync))
        .layer(Extension(state))
        .layer(CorsLayer::permissive())
}
