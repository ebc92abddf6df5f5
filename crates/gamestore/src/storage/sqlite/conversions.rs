//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types, and
//! for turning domain types into positional parameters.

use std::str::FromStr;

use gamestore_core::store::{Company, Device, User};
use rusqlite::types::{Type, Value};
use rusqlite::Row;

// ============================================================================
// Company conversions
// ============================================================================

/// Convert a SQLite row to a Company.
///
/// Expected columns: id, name, picture
pub fn row_to_company(row: &Row) -> rusqlite::Result<Company> {
    Ok(Company {
        id: row.get(0)?,
        name: row.get(1)?,
        picture: row.get(2)?,
    })
}

/// Parameters for `INSERT_COMPANY`: name, picture.
pub fn company_params(company: &Company) -> Vec<Value> {
    vec![
        Value::Text(company.name.clone()),
        optional_text(&company.picture),
    ]
}

// ============================================================================
// Device conversions
// ============================================================================

/// Convert a SQLite row to a Device.
///
/// Expected columns: id, name, category, price, in_stock, company_id, company name
pub fn row_to_device(row: &Row) -> rusqlite::Result<Device> {
    let category: String = row.get(2)?;

    Ok(Device {
        id: row.get(0)?,
        name: row.get(1)?,
        category: parse_text(2, &category)?,
        price: row.get(3)?,
        in_stock: row.get(4)?,
        company_id: row.get(5)?,
        company_name: row.get(6)?,
    })
}

/// Parameters for `INSERT_DEVICE`: name, category, price, in_stock, company_id.
pub fn device_params(device: &Device) -> Vec<Value> {
    vec![
        Value::Text(device.name.clone()),
        Value::Text(device.category.as_str().to_string()),
        Value::Real(device.price),
        Value::Integer(i64::from(device.in_stock)),
        Value::Integer(device.company_id),
    ]
}

// ============================================================================
// User conversions
// ============================================================================

/// Convert a SQLite row to a User.
///
/// Expected columns: id, username, email, role, password_hash, password_salt, profile_picture
pub fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    let role: String = row.get(3)?;

    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        role: parse_text(3, &role)?,
        password_hash: row.get(4)?,
        password_salt: row.get(5)?,
        profile_picture: row.get(6)?,
    })
}

/// Parameters for `INSERT_USER`: username, email, role, hash, salt, profile_picture.
pub fn user_params(user: &User) -> Vec<Value> {
    vec![
        Value::Text(user.username.clone()),
        Value::Text(user.email.clone()),
        Value::Text(user.role.as_str().to_string()),
        Value::Blob(user.password_hash.clone()),
        Value::Blob(user.password_salt.clone()),
        optional_text(&user.profile_picture),
    ]
}

// ============================================================================
// Helpers
// ============================================================================

fn optional_text(value: &Option<String>) -> Value {
    value.clone().map_or(Value::Null, Value::Text)
}

/// Parses a text column into a domain enum.
fn parse_text<T>(column: usize, s: &str) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    s.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}
