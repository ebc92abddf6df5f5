use thiserror::Error;

/// Errors produced when request input breaks a domain rule.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} cannot be empty")]
    Empty(&'static str),
    #[error("{field} must be between {min} and {max} characters")]
    Length {
        field: &'static str,
        min: usize,
        max: usize,
    },
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
    #[error("Price must be between {min} and {max}")]
    PriceOutOfRange { min: u32, max: u32 },
    #[error("Stock must be between 0 and {max}")]
    StockOutOfRange { max: u32 },
    #[error("Unknown device category: {0}")]
    UnknownCategory(String),
    #[error("Unknown role: {0}")]
    UnknownRole(String),
    #[error("{field} must be at least 1")]
    NotPositive { field: &'static str },
    #[error("Company {0} does not exist")]
    UnknownCompany(i64),
    #[error("Unsupported picture type: {0}")]
    UnsupportedPicture(String),
    #[error("Missing field: {0}")]
    MissingField(&'static str),
    #[error("{0} is a reserved name")]
    ReservedName(String),
}
