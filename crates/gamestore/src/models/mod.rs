//! Request and response bodies of the HTTP API.
//!
//! Field names are camelCase on the wire.

mod device;
mod page;
mod user;

pub use device::{DeviceRequest, DeviceResponse};
pub use page::PageQuery;
pub use user::{
    ChangePasswordRequest, ChangeRoleRequest, LoginRequest, UserResponse, UserWithToken,
};
