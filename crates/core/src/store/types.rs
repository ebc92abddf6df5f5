use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::storage::{Entity, FieldValue};

use super::error::ValidationError;

/// A device manufacturer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
    /// Link to the company logo, as returned by the picture store.
    pub picture: Option<String>,
}

impl Company {
    /// Creates a new, not yet persisted company.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            picture: None,
        }
    }

    /// Sets the picture link for this company.
    pub fn with_picture(mut self, picture: impl Into<String>) -> Self {
        self.picture = Some(picture.into());
        self
    }

    /// Sets a specific ID for this company (useful for testing).
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }
}

/// The kind of gaming device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceCategory {
    Mouse,
    Keyboard,
    Headphones,
    Earphones,
    Mat,
    Headset,
    CableHolder,
    Gamepad,
}

impl DeviceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mouse => "mouse",
            Self::Keyboard => "keyboard",
            Self::Headphones => "headphones",
            Self::Earphones => "earphones",
            Self::Mat => "mat",
            Self::Headset => "headset",
            Self::CableHolder => "cable_holder",
            Self::Gamepad => "gamepad",
        }
    }
}

impl fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mouse" => Ok(Self::Mouse),
            "keyboard" => Ok(Self::Keyboard),
            "headphones" => Ok(Self::Headphones),
            "earphones" => Ok(Self::Earphones),
            "mat" => Ok(Self::Mat),
            "headset" => Ok(Self::Headset),
            "cable_holder" => Ok(Self::CableHolder),
            "gamepad" => Ok(Self::Gamepad),
            other => Err(ValidationError::UnknownCategory(other.to_string())),
        }
    }
}

/// A device sold in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: i64,
    pub name: String,
    pub category: DeviceCategory,
    pub price: f64,
    pub in_stock: u32,
    /// The company that manufactures this device.
    pub company_id: i64,
    /// Name of the owning company, filled in by the storage layer on reads.
    pub company_name: Option<String>,
}

impl Device {
    /// Creates a new, not yet persisted device.
    pub fn new(
        name: impl Into<String>,
        category: DeviceCategory,
        price: f64,
        in_stock: u32,
        company_id: i64,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            category,
            price,
            in_stock,
            company_id,
            company_name: None,
        }
    }

    /// Sets the owning company's name.
    pub fn with_company_name(mut self, name: impl Into<String>) -> Self {
        self.company_name = Some(name.into());
        self
    }

    /// Sets a specific ID for this device (useful for testing).
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }
}

/// Role of a user account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Admin => "Admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "User" => Ok(Self::User),
            "Admin" => Ok(Self::Admin),
            other => Err(ValidationError::UnknownRole(other.to_string())),
        }
    }
}

/// A registered user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub password_hash: Vec<u8>,
    pub password_salt: Vec<u8>,
    /// Link to the profile picture, as returned by the picture store.
    pub profile_picture: Option<String>,
}

impl User {
    /// Creates a new, not yet persisted user with the `User` role.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: Vec<u8>,
        password_salt: Vec<u8>,
    ) -> Self {
        Self {
            id: 0,
            username: username.into(),
            email: email.into(),
            role: UserRole::User,
            password_hash,
            password_salt,
            profile_picture: None,
        }
    }

    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_profile_picture(mut self, link: Option<String>) -> Self {
        self.profile_picture = link;
        self
    }

    /// Sets a specific ID for this user (useful for testing).
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }
}

// ============================================================================
// Entity implementations
// ============================================================================

impl Entity for Company {
    const ENTITY_TYPE: &'static str = "Company";
    const UNIQUE_FIELDS: &'static [&'static str] = &["name"];

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "id" => Some(FieldValue::Integer(self.id)),
            "name" => Some(FieldValue::Text(self.name.clone())),
            _ => None,
        }
    }
}

impl Entity for Device {
    const ENTITY_TYPE: &'static str = "Device";
    const UNIQUE_FIELDS: &'static [&'static str] = &["name"];

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "id" => Some(FieldValue::Integer(self.id)),
            "name" => Some(FieldValue::Text(self.name.clone())),
            "category" => Some(FieldValue::Text(self.category.as_str().to_string())),
            "company_id" => Some(FieldValue::Integer(self.company_id)),
            "company_name" => self.company_name.clone().map(FieldValue::Text),
            _ => None,
        }
    }
}

impl Entity for User {
    const ENTITY_TYPE: &'static str = "User";
    const UNIQUE_FIELDS: &'static [&'static str] = &["username", "email"];

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "id" => Some(FieldValue::Integer(self.id)),
            "username" => Some(FieldValue::Text(self.username.clone())),
            "email" => Some(FieldValue::Text(self.email.clone())),
            "role" => Some(FieldValue::Text(self.role.as_str().to_string())),
            _ => None,
        }
    }
}
