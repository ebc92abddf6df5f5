pub mod companies;
pub mod devices;
pub mod error;
pub mod health;
mod multipart;
pub mod pictures;
pub mod users;

pub use error::AppError;
