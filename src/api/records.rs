// src/api/records.rs
use axum::{Extension, Json, extract::Path, http::StatusCode};
use serde::Serialize;

use crate::SharedState;
use crate::error::AppError;
use crate::model::RecordCandidate;
use crate::service;

#[derive(Serialize)]
pub struct CreatedRecord {
    pub id: i64,
}

// POST /api/zones/{id}/records
pub async fn create_record(
    Extension(state): Extension<SharedState>,
    Path(zone_id): Path<i64>,
    Json(req): Json<RecordCandidate>,
) -> Result<(StatusCode, Json<CreatedRecord>), AppError> {
    let id = service::create_record(&state, zone_id, &req).await?;
    Ok((StatusCode::CREATED, Json(CreatedRecord { id })))
}

// DELETE /api/zones/{id}/records/{record_id}
pub async fn delete_record(
    Extension(state): Extension<SharedState>,
    Path((zone_id, record_id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    service::delete_record(&state, zone_id, record_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
