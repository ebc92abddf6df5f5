mod error;
mod functions;
mod types;

pub use error::AuthError;
pub use functions::{
    can_act_on, generate_salt, hash_password, hash_password_with_salt, verify_password, SALT_LEN,
};
pub use types::{PasswordDigest, Principal};
