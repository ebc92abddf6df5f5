//! Company handlers (`/api/companies`).

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};

use gamestore_auth::AdminUser;
use gamestore_core::storage::PaginatedList;
use gamestore_core::store::{validate_id, Company};

use super::multipart::MultipartForm;
use crate::{handlers::AppError, models::PageQuery, state::AppState};

/// List companies (GET /api/companies).
pub async fn list_companies(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PaginatedList<Company>>, AppError> {
    let page = query.parameters()?;
    Ok(Json(state.companies.get_all(page).await?))
}

/// Get a company by ID (GET /api/companies/{id}).
pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Company>, AppError> {
    let id = validate_id(id)?;
    Ok(Json(state.companies.get_by_id(id).await?))
}

/// Create a company from a `name` field and an optional `picture` file
/// (POST /api/companies).
pub async fn create_company(
    _admin: AdminUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Company>), AppError> {
    let mut form = MultipartForm::read(multipart).await?;
    let name = form.require("name")?;
    let picture = form.take_file("picture");

    let company = state.companies.create(name, picture).await?;
    Ok((StatusCode::CREATED, Json(company)))
}

/// Update a company (PUT /api/companies/{id}).
pub async fn update_company(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<StatusCode, AppError> {
    let id = validate_id(id)?;
    let mut form = MultipartForm::read(multipart).await?;
    let name = form.require("name")?;
    let picture = form.take_file("picture");

    state.companies.update(id, name, picture).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a company and its devices (DELETE /api/companies/{id}).
pub async fn delete_company(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let id = validate_id(id)?;
    state.companies.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
