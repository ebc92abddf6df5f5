use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Auth errors for the gamestore_auth crate.
///
/// Wraps the core `AuthError` and adds the token and request failures
/// that only exist at the HTTP edge.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Core(#[from] gamestore_core::auth::AuthError),

    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token expired")]
    TokenExpired,

    #[error("admin role required")]
    AdminRequired,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        use gamestore_core::auth::AuthError as CoreError;

        let (status, message) = match &self {
            AuthError::Core(CoreError::InvalidCredentials) => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            AuthError::MissingToken | AuthError::InvalidToken(_) | AuthError::TokenExpired => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            AuthError::AdminRequired => {
                tracing::warn!("Rejected non-admin caller");
                (StatusCode::FORBIDDEN, self.to_string())
            }
            AuthError::Core(_) | AuthError::Signing(_) => {
                tracing::error!("Auth error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
