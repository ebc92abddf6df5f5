use serde::{Deserialize, Serialize};

use crate::store::{User, UserRole};

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: i64,
    pub username: String,
    pub role: UserRole,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            role: user.role,
        }
    }
}

/// A salted password digest ready to be stored on a [`User`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordDigest {
    pub hash: Vec<u8>,
    pub salt: Vec<u8>,
}
