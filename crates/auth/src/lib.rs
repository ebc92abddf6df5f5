//! Bearer-token authentication for gamestore.
//!
//! This crate provides:
//! - HS256 token issuing and validation
//! - Auth configuration from the environment
//! - Axum extractors for authenticated and admin callers

mod config;
mod error;
mod extractors;
mod state;
mod tokens;

pub use config::AuthConfig;
pub use error::AuthError;
pub use extractors::{AdminUser, CurrentUser};
pub use state::AuthState;
pub use tokens::{Claims, TokenService};
