use crate::domain::result::DomainResult;
use async_trait::async_trait;

/// Home device entity as persisted in the device table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub device_id: String,
    pub mac: String,
    pub name: String,
    pub device_type: String,
    pub home_id: String,
    /// Epoch seconds, set once at creation
    pub created_at: i64,
    /// Epoch seconds, refreshed on every mutation
    pub modified_at: i64,
}

/// Repository input for the (mac, homeId) uniqueness lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceExistsRepoInput {
    pub mac: String,
    pub home_id: String,
}

/// Repository input for creating a device. The id is assigned by the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDeviceRepoInput {
    pub mac: String,
    pub name: String,
    pub device_type: String,
    pub home_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetDeviceRepoInput {
    pub device_id: String,
}

/// Partial update. `None` and empty strings leave the stored attribute untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateDeviceRepoInput {
    pub device_id: String,
    pub mac: Option<String>,
    pub name: Option<String>,
    pub device_type: Option<String>,
    pub home_id: Option<String>,
}

impl UpdateDeviceRepoInput {
    /// True when at least one updatable field carries a non-empty value
    pub fn has_changes(&self) -> bool {
        [&self.mac, &self.name, &self.device_type, &self.home_id]
            .into_iter()
            .any(|field| field.as_deref().is_some_and(|value| !value.is_empty()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteDeviceRepoInput {
    pub device_id: String,
}

/// Repository trait for device persistence operations
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait DeviceRepository: Send + Sync {
    /// Returns true if any device already uses the given (mac, homeId) pair
    async fn exists_by_mac_and_home(&self, input: DeviceExistsRepoInput) -> DomainResult<bool>;

    /// Create a device with a freshly generated id and timestamps
    async fn create_device(&self, input: CreateDeviceRepoInput) -> DomainResult<Device>;

    /// Get a device by id, `DeviceNotFound` when absent
    async fn get_device(&self, input: GetDeviceRepoInput) -> DomainResult<Device>;

    /// Apply a partial update to an existing device
    async fn update_device(&self, input: UpdateDeviceRepoInput) -> DomainResult<()>;

    /// Delete an existing device
    async fn delete_device(&self, input: DeleteDeviceRepoInput) -> DomainResult<()>;
}
