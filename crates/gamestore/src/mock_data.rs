use gamestore_core::store::{Device, DeviceCategory, UserRole};

use crate::services::Registration;
use crate::state::AppState;

pub const DEMO_ADMIN_EMAIL: &str = "admin@gamestore.local";

const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Devices seeded for each demo company: name, category, price, stock.
const DEMO_CATALOG: &[(&str, &[(&str, DeviceCategory, f64, u32)])] = &[
    (
        "Razer",
        &[
            ("Viper Ultimate", DeviceCategory::Mouse, 129.99, 25),
            ("BlackWidow V4", DeviceCategory::Keyboard, 169.99, 12),
            ("Goliathus", DeviceCategory::Mat, 29.99, 40),
        ],
    ),
    (
        "Logitech",
        &[
            ("G Pro X Superlight", DeviceCategory::Mouse, 149.99, 18),
            ("G733", DeviceCategory::Headset, 139.99, 7),
            ("F310", DeviceCategory::Gamepad, 24.99, 0),
        ],
    ),
];

fn admin_password() -> String {
    match std::env::var("ADMIN_PASSWORD") {
        Ok(password) if !password.is_empty() => password,
        _ => {
            tracing::warn!("ADMIN_PASSWORD not set, using the default demo password");
            DEFAULT_ADMIN_PASSWORD.to_string()
        }
    }
}

/// Seeds an admin account, companies and devices.
///
/// Does nothing when the admin account already exists, so a persistent
/// backend is only seeded once.
pub async fn seed(state: &AppState) -> anyhow::Result<()> {
    if state.users.get_by_email(DEMO_ADMIN_EMAIL).await?.is_some() {
        tracing::debug!("Demo data already present");
        return Ok(());
    }

    let admin = state
        .users
        .register(
            Registration {
                username: "admin".to_string(),
                email: DEMO_ADMIN_EMAIL.to_string(),
                password: admin_password(),
            },
            None,
        )
        .await?;
    state.users.change_role(admin.id, UserRole::Admin).await?;

    let mut device_count = 0;
    for (company_name, devices) in DEMO_CATALOG {
        let company = state
            .companies
            .create(company_name.to_string(), None)
            .await?;

        for &(name, category, price, in_stock) in devices.iter() {
            state
                .devices
                .create(Device::new(name, category, price, in_stock, company.id))
                .await?;
            device_count += 1;
        }
    }

    tracing::info!(
        companies = DEMO_CATALOG.len(),
        devices = device_count,
        admin = DEMO_ADMIN_EMAIL,
        "Seeded demo data"
    );
    Ok(())
}
