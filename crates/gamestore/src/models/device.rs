use serde::{Deserialize, Serialize};

use gamestore_core::store::{Device, DeviceCategory};

/// Body of device create and update requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRequest {
    pub name: String,
    pub category: DeviceCategory,
    pub price: f64,
    pub in_stock: u32,
    pub company_id: i64,
}

impl DeviceRequest {
    pub fn into_device(self) -> Device {
        Device::new(
            self.name,
            self.category,
            self.price,
            self.in_stock,
            self.company_id,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceResponse {
    pub id: i64,
    pub name: String,
    pub category: DeviceCategory,
    pub price: f64,
    pub in_stock: u32,
    pub company_id: i64,
    pub company_name: Option<String>,
}

impl From<Device> for DeviceResponse {
    fn from(device: Device) -> Self {
        Self {
            id: device.id,
            name: device.name,
            category: device.category,
            price: device.price,
            in_stock: device.in_stock,
            company_id: device.company_id,
            company_name: device.company_name,
        }
    }
}
