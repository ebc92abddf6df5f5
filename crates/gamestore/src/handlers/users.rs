//! User handlers (`/api/users`).

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};

use gamestore_auth::{AdminUser, CurrentUser};
use gamestore_core::storage::PaginatedList;
use gamestore_core::store::validate_id;

use super::multipart::MultipartForm;
use crate::{
    handlers::AppError,
    models::{
        ChangePasswordRequest, ChangeRoleRequest, LoginRequest, PageQuery, UserResponse,
        UserWithToken,
    },
    services::Registration,
    state::AppState,
};

/// List users (GET /api/users). Admin only.
pub async fn list_users(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PaginatedList<UserResponse>>, AppError> {
    let page = query.parameters()?;
    let users = state.users.get_all(page).await?;
    Ok(Json(users.map(UserResponse::from)))
}

/// Get a user by ID (GET /api/users/{id}).
pub async fn get_user(
    _caller: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, AppError> {
    let id = validate_id(id)?;
    let user = state.users.get_by_id(id).await?;
    Ok(Json(user.into()))
}

/// Register a new account (POST /api/users/register).
///
/// Multipart fields: `username`, `email`, `password` and an optional
/// `profilePicture` file.
pub async fn register(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let mut form = MultipartForm::read(multipart).await?;
    let registration = Registration {
        username: form.require("username")?,
        email: form.require("email")?,
        password: form.require("password")?,
    };
    let picture = form.take_file("profilePicture");

    let user = state.users.register(registration, picture).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Log in with email and password (POST /api/users/login).
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<UserWithToken>, AppError> {
    let (user, token) = state.users.login(&payload.email, &payload.password).await?;
    Ok(Json(UserWithToken {
        user: user.into(),
        token,
    }))
}

/// Update username and profile picture (PUT /api/users/{id}).
pub async fn update_user(
    CurrentUser(caller): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<StatusCode, AppError> {
    let id = validate_id(id)?;
    let mut form = MultipartForm::read(multipart).await?;
    let username = form.require("username")?;
    let picture = form.take_file("profilePicture");

    state.users.update(id, username, picture, &caller).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Change a password and get a fresh token (PUT /api/users/{id}/changePassword).
pub async fn change_password(
    CurrentUser(caller): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<String>, AppError> {
    let id = validate_id(id)?;
    let token = state
        .users
        .change_password(id, &payload.password, &caller)
        .await?;
    Ok(Json(token))
}

/// Change a user's role (PUT /api/users/{id}/changeRole). Admin only.
pub async fn change_role(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ChangeRoleRequest>,
) -> Result<StatusCode, AppError> {
    let id = validate_id(id)?;
    state.users.change_role(id, payload.role).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete an account (DELETE /api/users/{id}).
pub async fn delete_user(
    CurrentUser(caller): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let id = validate_id(id)?;
    state.users.delete(id, &caller).await?;
    Ok(StatusCode::NO_CONTENT)
}
