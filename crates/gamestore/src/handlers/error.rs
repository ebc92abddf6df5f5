use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use gamestore_auth::AuthError;
use gamestore_core::service::{service_error_to_status_code, ServiceError};
use gamestore_core::storage::{repository_error_to_status_code, PageError, RepositoryError};
use gamestore_core::store::ValidationError;

/// Handler error: any error, mapped to a status code by its type.
pub struct AppError(pub anyhow::Error);

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let err = match self.0.downcast::<AuthError>() {
            Ok(auth_error) => return auth_error.into_response(),
            Err(err) => err,
        };

        let (status_code, body) = if let Some(service_error) = err.downcast_ref::<ServiceError>() {
            let status_code = status(service_error_to_status_code(service_error));
            let body = match service_error {
                ServiceError::NameNotUnique { field, .. } => {
                    json!({ "error": service_error.to_string(), "field": field })
                }
                _ => json!({ "error": service_error.to_string() }),
            };
            (status_code, body)
        } else if let Some(repo_error) = err.downcast_ref::<RepositoryError>() {
            (
                status(repository_error_to_status_code(repo_error)),
                json!({ "error": repo_error.to_string() }),
            )
        } else if err.is::<ValidationError>() || err.is::<PageError>() {
            (StatusCode::BAD_REQUEST, json!({ "error": err.to_string() }))
        } else if let Some(multipart_error) = err.downcast_ref::<MultipartError>() {
            (
                multipart_error.status(),
                json!({ "error": multipart_error.body_text() }),
            )
        } else {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": err.to_string() }),
            )
        };

        if status_code.is_server_error() {
            tracing::error!(error = %err, "Request failed");
        } else {
            tracing::debug!(status = %status_code, error = %err, "Request rejected");
        }

        (status_code, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn respond(err: impl Into<anyhow::Error>) -> (StatusCode, serde_json::Value) {
        let response = AppError(err.into()).into_response();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_is_404() {
        let (status, _) = respond(ServiceError::NotFound {
            entity_type: "Device",
            id: 1,
        })
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_name_not_unique_is_409_with_field() {
        let (status, body) = respond(ServiceError::NameNotUnique {
            entity_type: "User",
            field: "email".to_string(),
            value: "a@example.com".to_string(),
        })
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["field"], "email");
    }

    #[tokio::test]
    async fn test_validation_is_400() {
        let (status, _) = respond(ValidationError::InvalidEmail("nope".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_auth_error_keeps_its_status() {
        let (status, _) = respond(AuthError::AdminRequired).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_connection_failure_is_503() {
        let (status, _) = respond(ServiceError::Repository(RepositoryError::ConnectionFailed(
            "down".to_string(),
        )))
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_unknown_error_is_500() {
        let (status, body) = respond(anyhow::anyhow!("boom")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "boom");
    }
}
