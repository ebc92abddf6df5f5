use thiserror::Error;

/// Errors that can occur when building pagination parameters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PageError {
    #[error("Page number must be at least 1")]
    InvalidPageNumber,
    #[error("Page size must be at least 1")]
    InvalidPageSize,
}

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: &'static str, id: i64 },
    /// A unique constraint on `field` rejected the write.
    #[error("{entity_type} with the same {field} already exists")]
    UniqueViolation {
        entity_type: &'static str,
        field: String,
    },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
