//! Device handlers (`/api/devices`).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use gamestore_auth::AdminUser;
use gamestore_core::storage::PaginatedList;
use gamestore_core::store::validate_id;

use crate::{
    handlers::AppError,
    models::{DeviceRequest, DeviceResponse, PageQuery},
    state::AppState,
};

/// List devices, optionally of one company (GET /api/devices).
pub async fn list_devices(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PaginatedList<DeviceResponse>>, AppError> {
    let page = query.parameters()?;
    let devices = state
        .devices
        .get_all(page, query.company_name.as_deref())
        .await?;
    Ok(Json(devices.map(DeviceResponse::from)))
}

/// Get a device by ID (GET /api/devices/{id}).
pub async fn get_device(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeviceResponse>, AppError> {
    let id = validate_id(id)?;
    let device = state.devices.get_by_id(id).await?;
    Ok(Json(device.into()))
}

/// Create a device (POST /api/devices).
pub async fn create_device(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(payload): Json<DeviceRequest>,
) -> Result<(StatusCode, Json<DeviceResponse>), AppError> {
    let device = state.devices.create(payload.into_device()).await?;
    Ok((StatusCode::CREATED, Json(device.into())))
}

/// Replace a device (PUT /api/devices/{id}).
pub async fn update_device(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<DeviceRequest>,
) -> Result<StatusCode, AppError> {
    let id = validate_id(id)?;
    state
        .devices
        .update(payload.into_device().with_id(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a device (DELETE /api/devices/{id}).
pub async fn delete_device(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let id = validate_id(id)?;
    state.devices.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
