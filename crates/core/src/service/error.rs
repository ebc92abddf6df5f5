use thiserror::Error;

use crate::cache::{CacheError, SerializationError};
use crate::storage::{Entity, PageError, RepositoryError};
use crate::store::ValidationError;

/// Errors surfaced by the entity services.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ServiceError {
    #[error("{entity_type} with id {id} not found")]
    NotFound { entity_type: &'static str, id: i64 },
    /// A unique field collided with an existing record.
    #[error("{entity_type} with {field} '{value}' already exists")]
    NameNotUnique {
        entity_type: &'static str,
        field: String,
        value: String,
    },
    #[error("Not enough rights to perform this action")]
    NotEnoughRights,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Page(#[from] PageError),
    #[error(transparent)]
    Repository(RepositoryError),
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error(transparent)]
    Serialization(#[from] SerializationError),
    #[error("Picture store failed: {0}")]
    Picture(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound { entity_type, id } => Self::NotFound { entity_type, id },
            other => Self::Repository(other),
        }
    }
}

impl ServiceError {
    /// Translates a write failure for `entity` into a service error.
    ///
    /// A `UniqueViolation` becomes `NameNotUnique` carrying the offending
    /// value. Every other repository error passes through unchanged.
    pub fn from_write<E: Entity>(error: RepositoryError, entity: &E) -> Self {
        match error {
            RepositoryError::UniqueViolation { entity_type, field } => {
                let value = entity
                    .field_value(&field)
                    .map(|v| v.to_string())
                    .unwrap_or_default();
                Self::NameNotUnique {
                    entity_type,
                    field,
                    value,
                }
            }
            other => other.into(),
        }
    }
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Company;

    #[test]
    fn test_unique_violation_becomes_name_not_unique() {
        let company = Company::new("Razer");
        let error = ServiceError::from_write(
            RepositoryError::UniqueViolation {
                entity_type: "Company",
                field: "name".to_string(),
            },
            &company,
        );

        assert_eq!(
            error,
            ServiceError::NameNotUnique {
                entity_type: "Company",
                field: "name".to_string(),
                value: "Razer".to_string(),
            }
        );
        assert_eq!(error.to_string(), "Company with name 'Razer' already exists");
    }

    #[test]
    fn test_other_write_errors_pass_through() {
        let company = Company::new("Razer");
        let error = ServiceError::from_write(
            RepositoryError::QueryFailed("disk I/O error".to_string()),
            &company,
        );
        assert_eq!(
            error,
            ServiceError::Repository(RepositoryError::QueryFailed("disk I/O error".to_string()))
        );
    }

    #[test]
    fn test_repository_not_found_becomes_service_not_found() {
        let error: ServiceError = RepositoryError::NotFound {
            entity_type: "Device",
            id: 9,
        }
        .into();
        assert_eq!(
            error,
            ServiceError::NotFound {
                entity_type: "Device",
                id: 9
            }
        );
    }
}
