//! Entity services.
//!
//! Each service owns the repositories it needs behind `Arc<dyn Repository<_>>`
//! and translates repository failures into `ServiceError`.

mod company;
mod device;
pub mod pictures;
mod user;

pub use company::CompanyService;
pub use device::DeviceService;
pub use pictures::{FsPictureStore, PictureStore, PictureUpload};
pub use user::{Registration, UserService};
