use crate::cache::CacheError;
use crate::storage::repository_error_to_status_code;

use super::ServiceError;

/// Maps a [`ServiceError`] to an HTTP status code.
///
/// ```
/// use gamestore_core::service::{ServiceError, service_error_to_status_code};
///
/// assert_eq!(service_error_to_status_code(&ServiceError::NotEnoughRights), 403);
/// ```
pub fn service_error_to_status_code(error: &ServiceError) -> u16 {
    match error {
        ServiceError::NotFound { .. } => 404,
        ServiceError::NameNotUnique { .. } => 409,
        ServiceError::NotEnoughRights => 403,
        ServiceError::InvalidCredentials => 401,
        ServiceError::Validation(_) | ServiceError::Page(_) => 400,
        ServiceError::Repository(e) => repository_error_to_status_code(e),
        ServiceError::Cache(CacheError::ConnectionFailed(_)) => 503,
        ServiceError::Cache(_) => 500,
        ServiceError::Serialization(_) => 500,
        ServiceError::Picture(_) | ServiceError::Internal(_) => 500,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{PageError, RepositoryError};
    use crate::store::ValidationError;

    #[test]
    fn test_domain_errors() {
        assert_eq!(
            service_error_to_status_code(&ServiceError::NotFound {
                entity_type: "Device",
                id: 1
            }),
            404
        );
        assert_eq!(
            service_error_to_status_code(&ServiceError::NameNotUnique {
                entity_type: "Device",
                field: "name".to_string(),
                value: "Viper".to_string(),
            }),
            409
        );
        assert_eq!(
            service_error_to_status_code(&ServiceError::InvalidCredentials),
            401
        );
    }

    #[test]
    fn test_bad_input_maps_to_400() {
        assert_eq!(
            service_error_to_status_code(&ServiceError::Validation(ValidationError::Empty(
                "Name"
            ))),
            400
        );
        assert_eq!(
            service_error_to_status_code(&ServiceError::Page(PageError::InvalidPageSize)),
            400
        );
    }

    #[test]
    fn test_infrastructure_errors() {
        assert_eq!(
            service_error_to_status_code(&ServiceError::Repository(
                RepositoryError::ConnectionFailed("closed".to_string())
            )),
            503
        );
        assert_eq!(
            service_error_to_status_code(&ServiceError::Cache(CacheError::OperationFailed(
                "oops".to_string()
            ))),
            500
        );
        assert_eq!(
            service_error_to_status_code(&ServiceError::Picture("disk full".to_string())),
            500
        );
    }
}
