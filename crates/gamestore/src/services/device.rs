//! Device service with a cache-aside read path.
//!
//! Reads check the cache first and populate it from the repository on a
//! miss. Writes go straight to the repository; cached entries are left as
//! they are until the same key is populated again.

use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};

use gamestore_core::cache::{deserialize, device_key, devices_key, serialize, Cache};
use gamestore_core::service::{Result, ServiceError};
use gamestore_core::storage::{
    PageParameters, PaginatedList, QuerySpec, Repository, RepositoryError,
};
use gamestore_core::store::{validate_device, Company, Device, ValidationError};

pub struct DeviceService {
    devices: Arc<dyn Repository<Device>>,
    companies: Arc<dyn Repository<Company>>,
    cache: Arc<dyn Cache>,
    ttl: Option<Duration>,
}

impl DeviceService {
    /// Creates a device service.
    ///
    /// `ttl` applies to every populated cache entry; `None` keeps entries
    /// until they are overwritten.
    pub fn new(
        devices: Arc<dyn Repository<Device>>,
        companies: Arc<dyn Repository<Company>>,
        cache: Arc<dyn Cache>,
        ttl: Option<Duration>,
    ) -> Self {
        Self {
            devices,
            companies,
            cache,
            ttl,
        }
    }

    /// Gets a device, from the cache when possible.
    pub async fn get_by_id(&self, id: i64) -> Result<Device> {
        let key = device_key(id);

        if let Some(device) = self.cached::<Device>(&key).await? {
            tracing::trace!(device_id = id, "Cache hit for device");
            return Ok(device);
        }
        tracing::trace!(device_id = id, "Cache miss for device");

        let Some(device) = self.devices.get_by_id(id).await? else {
            tracing::warn!(device_id = id, "Device not found");
            return Err(ServiceError::NotFound {
                entity_type: "Device",
                id,
            });
        };

        self.populate(&key, &device).await?;
        tracing::info!(device_id = id, "Retrieved device");
        Ok(device)
    }

    /// Gets one page of devices, optionally only those of one company.
    ///
    /// The cache holds the full filtered list; pages are cut from it.
    pub async fn get_all(
        &self,
        page: PageParameters,
        company_name: Option<&str>,
    ) -> Result<PaginatedList<Device>> {
        let spec = match company_name {
            Some(name) => QuerySpec::where_eq("company_name", name),
            None => QuerySpec::all(),
        };
        let key = devices_key(&spec);

        if let Some(all) = self.cached::<Vec<Device>>(&key).await? {
            tracing::trace!(key = %key, "Cache hit for device list");
            return Ok(PaginatedList::from_full_list(all, page));
        }
        tracing::trace!(key = %key, "Cache miss for device list");

        let all = self.devices.find(&spec).await?;
        self.populate(&key, &all).await?;

        tracing::info!(
            key = %key,
            total = all.len(),
            page_number = page.page_number,
            "Retrieved devices"
        );
        Ok(PaginatedList::from_full_list(all, page))
    }

    pub async fn create(&self, device: Device) -> Result<Device> {
        let device = self.prepare(device).await?;

        match self.devices.create(&device).await {
            Ok(created) => {
                tracing::info!(device_id = created.id, name = %created.name, "Created device");
                Ok(created)
            }
            Err(err) => Err(self.write_failed(err, &device)),
        }
    }

    /// Replaces a device. Cached copies are not refreshed.
    pub async fn update(&self, device: Device) -> Result<()> {
        let device = self.prepare(device).await?;

        match self.devices.update(&device).await {
            Ok(()) => {
                tracing::info!(device_id = device.id, "Updated device");
                Ok(())
            }
            Err(err) => Err(self.write_failed(err, &device)),
        }
    }

    /// Deletes a device. Cached copies are not removed.
    pub async fn delete(&self, id: i64) -> Result<()> {
        if let Err(err) = self.devices.delete(id).await {
            let err = ServiceError::from(err);
            if matches!(err, ServiceError::NotFound { .. }) {
                tracing::warn!(device_id = id, "Device to delete not found");
            }
            return Err(err);
        }

        tracing::info!(device_id = id, "Deleted device");
        Ok(())
    }

    /// Validates a device and fills in its company name.
    async fn prepare(&self, device: Device) -> Result<Device> {
        validate_device(&device)?;

        let company = self
            .companies
            .get_by_id(device.company_id)
            .await?
            .ok_or(ValidationError::UnknownCompany(device.company_id))?;

        Ok(device.with_company_name(company.name))
    }

    fn write_failed(&self, err: RepositoryError, device: &Device) -> ServiceError {
        let err = ServiceError::from_write(err, device);
        if let ServiceError::NameNotUnique { field, value, .. } = &err {
            tracing::warn!(field = %field, value = %value, "Device is not unique");
        }
        err
    }

    /// Reads and decodes a cache entry. An entry that no longer decodes is
    /// treated as a miss.
    async fn cached<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(bytes) = self.cache.get(key).await? else {
            return Ok(None);
        };

        match deserialize(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                tracing::warn!(key, error = %err, "Cached value could not be decoded");
                Ok(None)
            }
        }
    }

    async fn populate<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serialize(value)?;
        self.cache.set(key, &bytes, self.ttl).await?;
        Ok(())
    }
}
