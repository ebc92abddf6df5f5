use crate::storage::{Entity, QuerySpec};
use crate::store::Device;

/// Returns the cache key for a single device.
pub fn device_key(device_id: i64) -> String {
    format!("device:{}", device_id)
}

/// Returns the cache key for the full device list matching `spec`.
///
/// An unfiltered listing uses `devices:all`; a listing filtered by company
/// uses `devices:{companyName}`.
pub fn devices_key(spec: &QuerySpec<Device>) -> String {
    list_key("devices", spec)
}

/// Returns the cache key for an entity list under `prefix`.
pub fn list_key<E: Entity>(prefix: &str, spec: &QuerySpec<E>) -> String {
    format!("{}:{}", prefix, spec.discriminator())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_key() {
        assert_eq!(device_key(42), "device:42");
    }

    #[test]
    fn test_devices_key_unfiltered() {
        assert_eq!(devices_key(&QuerySpec::all()), "devices:all");
    }

    #[test]
    fn test_devices_key_by_company() {
        let spec = QuerySpec::where_eq("company_name", "Razer");
        assert_eq!(devices_key(&spec), "devices:Razer");
    }

    #[test]
    fn test_distinct_companies_get_distinct_keys() {
        let a = devices_key(&QuerySpec::where_eq("company_name", "Razer"));
        let b = devices_key(&QuerySpec::where_eq("company_name", "Logitech"));
        assert_ne!(a, b);
    }
}
