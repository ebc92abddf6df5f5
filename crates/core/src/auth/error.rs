use thiserror::Error;

use crate::service::ServiceError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid HMAC key: {0}")]
    InvalidKey(String),
}

impl From<AuthError> for ServiceError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::InvalidCredentials => ServiceError::InvalidCredentials,
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_credentials_maps_to_service_error() {
        assert_eq!(
            ServiceError::from(AuthError::InvalidCredentials),
            ServiceError::InvalidCredentials
        );
    }

    #[test]
    fn test_key_error_is_internal() {
        let error = ServiceError::from(AuthError::InvalidKey("empty".to_string()));
        assert_eq!(
            error,
            ServiceError::Internal("invalid HMAC key: empty".to_string())
        );
    }
}
