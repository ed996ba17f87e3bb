// src/api/zones.rs
use axum::{Extension, Json, extract::Path, http::StatusCode};

use crate::SharedState;
use crate::error::AppError;
use crate::model::ZoneCandidate;
use crate::service::{self, ConfigOutcome, ResyncReport, ZoneMutation, ZoneSummary, ZoneView};

// GET /api/zones
pub async fn list_zones(
    Extension(state): Extension<SharedState>,
) -> Result<Json<Vec<ZoneSummary>>, AppError> {
    Ok(Json(service::list_zones(&state).await?))
}

// POST /api/zones
pub async fn create_zone(
    Extension(state): Extension<SharedState>,
    Json(req): Json<ZoneCandidate>,
) -> Result<(StatusCode, Json<ZoneMutation>), AppError> {
    let created = service::create_zone(&state, &req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

// GET /api/zones/{id}
pub async fn get_zone(
    Extension(state): Extension<SharedState>,
    Path(id): Path<i64>,
) -> Result<Json<ZoneView>, AppError> {
    Ok(Json(service::get_zone_with_records(&state, id).await?))
}

// PUT /api/zones/{id}
pub async fn update_zone(
    Extension(state): Extension<SharedState>,
    Path(id): Path<i64>,
    Json(req): Json<ZoneCandidate>,
) -> Result<Json<ZoneMutation>, AppError> {
    Ok(Json(service::update_zone(&state, id, &req).await?))
}

// DELETE /api/zones/{id}
pub async fn delete_zone(
    Extension(state): Extension<SharedState>,
    Path(id): Path<i64>,
) -> Result<Json<ConfigOutcome>, AppError> {
    Ok(Json(service::delete_zone(&state, id).await?))
}

// POST /api/resync
pub async fn resync(
    Extension(state): Extension<SharedState>,
) -> Result<Json<ResyncReport>, AppError> {
    Ok(Json(service::resync(&state).await?))
}
