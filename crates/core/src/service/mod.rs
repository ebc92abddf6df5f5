//! Error vocabulary shared by the entity services.

mod error;
mod http_mapping;

pub use error::{Result, ServiceError};
pub use http_mapping::service_error_to_status_code;
