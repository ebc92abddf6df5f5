//! Picture file serving (`/api/pictures/{folder}/{file}`).

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::{handlers::AppError, state::AppState};

fn content_type(file: &str) -> &'static str {
    let ext = file
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Serve a stored picture.
pub async fn get_picture(
    State(state): State<AppState>,
    Path((folder, file)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let Some(contents) = state.pictures.read(&folder, &file).await? else {
        return Ok((StatusCode::NOT_FOUND, "Not found").into_response());
    };

    Ok((
        [
            (header::CONTENT_TYPE, content_type(&file)),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        Body::from(contents),
    )
        .into_response())
}
