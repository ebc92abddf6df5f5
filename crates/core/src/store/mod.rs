//! Store domain: companies, devices and users, plus the rules input must
//! satisfy before it reaches a repository.

mod error;
mod operations;
mod types;

pub use error::ValidationError;
pub use operations::*;
pub use types::{Company, Device, DeviceCategory, User, UserRole};
