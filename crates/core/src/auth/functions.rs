use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha512;

use super::{AuthError, PasswordDigest, Principal};

type HmacSha512 = Hmac<Sha512>;

/// Length in bytes of a freshly generated password salt.
pub const SALT_LEN: usize = 64;

/// Generate a random salt for password hashing.
pub fn generate_salt() -> Vec<u8> {
    let mut salt = vec![0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}

fn keyed_mac(salt: &[u8]) -> Result<HmacSha512, AuthError> {
    HmacSha512::new_from_slice(salt).map_err(|e| AuthError::InvalidKey(e.to_string()))
}

/// Hash a password with HMAC-SHA512, keyed by a new random salt.
pub fn hash_password(password: &str) -> Result<PasswordDigest, AuthError> {
    let salt = generate_salt();
    let hash = hash_password_with_salt(password, &salt)?;
    Ok(PasswordDigest { hash, salt })
}

/// Hash a password with HMAC-SHA512 keyed by `salt`.
pub fn hash_password_with_salt(password: &str, salt: &[u8]) -> Result<Vec<u8>, AuthError> {
    let mut mac = keyed_mac(salt)?;
    mac.update(password.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Check a password against a stored digest in constant time.
pub fn verify_password(password: &str, hash: &[u8], salt: &[u8]) -> Result<(), AuthError> {
    let mut mac = keyed_mac(salt)?;
    mac.update(password.as_bytes());
    mac.verify_slice(hash).map_err(|_| AuthError::InvalidCredentials)
}

/// Whether `caller` may read or modify the account `target_user_id`.
///
/// Users may act on their own account; admins may act on any account.
pub fn can_act_on(target_user_id: i64, caller: &Principal) -> bool {
    caller.is_admin() || caller.user_id == target_user_id
}
