use crate::storage::UNFILTERED;

use super::error::ValidationError;
use super::types::{Company, Device};

pub const USERNAME_MIN: usize = 1;
pub const USERNAME_MAX: usize = 20;
pub const PASSWORD_MIN: usize = 6;
pub const PASSWORD_MAX: usize = 50;
pub const NAME_MAX: usize = 100;
pub const PRICE_MIN: u32 = 1;
pub const PRICE_MAX: u32 = 1000;
pub const STOCK_MAX: u32 = 5000;

/// Picture extensions the picture store accepts.
pub const PICTURE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Validates a path id. Ids start at 1.
pub fn validate_id(id: i64) -> Result<i64, ValidationError> {
    if id < 1 {
        return Err(ValidationError::NotPositive { field: "id" });
    }
    Ok(id)
}

fn validate_name(field: &'static str, name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::Empty(field));
    }
    if name.chars().count() > NAME_MAX {
        return Err(ValidationError::Length {
            field,
            min: 1,
            max: NAME_MAX,
        });
    }
    Ok(())
}

/// Validates a company before creation or update.
///
/// A company named like the unfiltered discriminator would share the
/// `devices:all` cache key with the full device list, so that name is refused.
pub fn validate_company(company: &Company) -> Result<(), ValidationError> {
    validate_name("Name", &company.name)?;
    if company.name == UNFILTERED {
        return Err(ValidationError::ReservedName(company.name.clone()));
    }
    Ok(())
}

/// Validates a device before creation or update.
///
/// Company existence is checked by the service, which has store access.
pub fn validate_device(device: &Device) -> Result<(), ValidationError> {
    validate_name("Name", &device.name)?;
    if !(f64::from(PRICE_MIN)..=f64::from(PRICE_MAX)).contains(&device.price) {
        return Err(ValidationError::PriceOutOfRange {
            min: PRICE_MIN,
            max: PRICE_MAX,
        });
    }
    if device.in_stock > STOCK_MAX {
        return Err(ValidationError::StockOutOfRange { max: STOCK_MAX });
    }
    if device.company_id < 1 {
        return Err(ValidationError::NotPositive {
            field: "companyId",
        });
    }
    Ok(())
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let len = username.trim().chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        return Err(ValidationError::Length {
            field: "Username",
            min: USERNAME_MIN,
            max: USERNAME_MAX,
        });
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();
    if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&len) {
        return Err(ValidationError::Length {
            field: "Password",
            min: PASSWORD_MIN,
            max: PASSWORD_MAX,
        });
    }
    Ok(())
}

/// Minimal shape check: something before and after a single `@`.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidEmail(email.to_string());
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    Ok(())
}

/// Turns an entity name into a safe file stem.
///
/// Keeps ASCII alphanumerics, `-` and `_`, lower-cases the rest and
/// replaces anything else with `-`.
pub fn sanitize_file_stem(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();

    if stem.is_empty() {
        "picture".to_string()
    } else {
        stem
    }
}

/// File stem for a picture owned by the entity `owner_id`.
///
/// Sanitized names can collide ("Hyper X" and "hyper-x"), so the owner's
/// id leads the stem and keeps it unique within a folder.
pub fn picture_stem(owner_id: i64, name: &str) -> String {
    format!("{owner_id}-{}", sanitize_file_stem(name))
}

/// Extracts and checks the extension of an uploaded picture's file name.
pub fn picture_extension(file_name: &str) -> Result<String, ValidationError> {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .ok_or_else(|| ValidationError::UnsupportedPicture(file_name.to_string()))?;

    if PICTURE_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(ValidationError::UnsupportedPicture(file_name.to_string()))
    }
}

/// True when a single path segment is safe to join onto a directory.
pub fn is_safe_path_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DeviceCategory;

    fn device(price: f64, stock: u32) -> Device {
        Device::new("Viper", DeviceCategory::Mouse, price, stock, 1)
    }

    #[test]
    fn test_validate_id() {
        assert_eq!(validate_id(1), Ok(1));
        assert!(validate_id(0).is_err());
        assert!(validate_id(-5).is_err());
    }

    #[test]
    fn test_validate_company_rejects_blank_name() {
        assert_eq!(
            validate_company(&Company::new("   ")),
            Err(ValidationError::Empty("Name"))
        );
        assert!(validate_company(&Company::new("Razer")).is_ok());
    }

    #[test]
    fn test_validate_company_rejects_unfiltered_key_name() {
        assert_eq!(
            validate_company(&Company::new("all")),
            Err(ValidationError::ReservedName("all".to_string()))
        );
        assert!(validate_company(&Company::new("All Gear")).is_ok());
    }

    #[test]
    fn test_validate_device_price_bounds() {
        assert!(validate_device(&device(1.0, 0)).is_ok());
        assert!(validate_device(&device(1000.0, 0)).is_ok());
        assert!(validate_device(&device(0.5, 0)).is_err());
        assert!(validate_device(&device(1000.01, 0)).is_err());
    }

    #[test]
    fn test_validate_device_stock_bounds() {
        assert!(validate_device(&device(10.0, 5000)).is_ok());
        assert_eq!(
            validate_device(&device(10.0, 5001)),
            Err(ValidationError::StockOutOfRange { max: 5000 })
        );
    }

    #[test]
    fn test_validate_device_requires_company() {
        let mut d = device(10.0, 1);
        d.company_id = 0;
        assert!(validate_device(&d).is_err());
    }

    #[test]
    fn test_validate_username_length() {
        assert!(validate_username("a").is_ok());
        assert!(validate_username(&"a".repeat(20)).is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username(&"a".repeat(21)).is_err());
    }

    #[test]
    fn test_validate_password_length() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"x".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("alice").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("a@b@c").is_err());
    }

    #[test]
    fn test_sanitize_file_stem() {
        assert_eq!(sanitize_file_stem("Razer Inc."), "razer-inc-");
        assert_eq!(sanitize_file_stem("../etc/passwd"), "---etc-passwd");
        assert_eq!(sanitize_file_stem("  "), "picture");
    }

    #[test]
    fn test_picture_stem_keeps_colliding_names_apart() {
        assert_eq!(sanitize_file_stem("Hyper X"), sanitize_file_stem("hyper-x"));
        assert_ne!(picture_stem(1, "Hyper X"), picture_stem(2, "hyper-x"));
        assert_eq!(picture_stem(7, "a.b@x.io"), "7-a-b-x-io");
    }

    #[test]
    fn test_picture_extension() {
        assert_eq!(picture_extension("logo.PNG"), Ok("png".to_string()));
        assert!(picture_extension("script.sh").is_err());
        assert!(picture_extension("noext").is_err());
    }

    #[test]
    fn test_is_safe_path_segment() {
        assert!(is_safe_path_segment("razer.png"));
        assert!(!is_safe_path_segment(".."));
        assert!(!is_safe_path_segment("a/b"));
        assert!(!is_safe_path_segment(""));
    }
}
