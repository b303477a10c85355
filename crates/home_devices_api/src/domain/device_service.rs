use crate::domain::device_rules::*;
use common::domain::{
    CreateDeviceRepoInput, DeleteDeviceRepoInput, Device, DeviceExistsRepoInput,
    DeviceRepository, DomainError, DomainResult, GetDeviceRepoInput, UpdateDeviceRepoInput,
};
use common::garde::FieldOrder;
use garde::Validate;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Service request for creating a device
#[derive(Debug, Clone, Validate)]
pub struct CreateDeviceRequest {
    #[garde(custom(validate_mac))]
    pub mac: String,
    #[garde(custom(validate_name))]
    pub name: String,
    #[garde(custom(validate_type))]
    pub device_type: String,
    #[garde(custom(validate_home_id))]
    pub home_id: String,
}

impl FieldOrder for CreateDeviceRequest {
    const FIELDS: &'static [&'static str] = &["mac", "name", "device_type", "home_id"];
}

/// Service request for getting a device
#[derive(Debug, Clone, Validate)]
pub struct GetDeviceRequest {
    #[garde(custom(validate_device_id))]
    pub device_id: String,
}

impl FieldOrder for GetDeviceRequest {
    const FIELDS: &'static [&'static str] = &["device_id"];
}

/// Service request for a partial device update. Empty values count as absent.
#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateDeviceRequest {
    #[garde(custom(validate_device_id))]
    pub device_id: String,
    #[garde(custom(validate_optional_mac))]
    pub mac: Option<String>,
    #[garde(custom(validate_optional_name))]
    pub name: Option<String>,
    #[garde(custom(validate_optional_type))]
    pub device_type: Option<String>,
    #[garde(custom(validate_optional_home_id))]
    pub home_id: Option<String>,
}

impl FieldOrder for UpdateDeviceRequest {
    const FIELDS: &'static [&'static str] =
        &["device_id", "mac", "name", "device_type", "home_id"];
}

/// Service request for deleting a device
#[derive(Debug, Clone, Validate)]
pub struct DeleteDeviceRequest {
    #[garde(custom(validate_device_id))]
    pub device_id: String,
}

impl FieldOrder for DeleteDeviceRequest {
    const FIELDS: &'static [&'static str] = &["device_id"];
}

/// Domain service for home device management.
///
/// Owns the business rules that span store operations: the (mac, homeId)
/// uniqueness check before create and the at-least-one-field rule before update.
pub struct DeviceService {
    device_repository: Arc<dyn DeviceRepository>,
}

impl DeviceService {
    pub fn new(device_repository: Arc<dyn DeviceRepository>) -> Self {
        Self { device_repository }
    }

    /// Create a device unless one with the same (mac, homeId) exists.
    ///
    /// The existence check and the write are separate store calls, so two
    /// concurrent creates for the same pair can both succeed.
    #[instrument(skip(self, request), fields(mac = %request.mac, home_id = %request.home_id))]
    pub async fn create_device(&self, request: CreateDeviceRequest) -> DomainResult<Device> {
        common::garde::validate(&request)?;

        let exists = self
            .device_repository
            .exists_by_mac_and_home(DeviceExistsRepoInput {
                mac: request.mac.clone(),
                home_id: request.home_id.clone(),
            })
            .await?;

        if exists {
            debug!("device with same mac and homeId already exists");
            return Err(DomainError::DeviceAlreadyExists {
                mac: request.mac,
                home_id: request.home_id,
            });
        }

        let device = self
            .device_repository
            .create_device(CreateDeviceRepoInput {
                mac: request.mac,
                name: request.name,
                device_type: request.device_type,
                home_id: request.home_id,
            })
            .await?;

        info!(device_id = %device.device_id, "Device created successfully");
        Ok(device)
    }

    #[instrument(skip(self, request), fields(device_id = %request.device_id))]
    pub async fn get_device(&self, request: GetDeviceRequest) -> DomainResult<Device> {
        common::garde::validate(&request)?;

        self.device_repository
            .get_device(GetDeviceRepoInput {
                device_id: request.device_id,
            })
            .await
    }

    /// Apply a partial update; fails with `NoFieldsToUpdate` before touching the store
    /// when no field carries a value.
    #[instrument(skip(self, request), fields(device_id = %request.device_id))]
    pub async fn update_device(&self, request: UpdateDeviceRequest) -> DomainResult<()> {
        common::garde::validate(&request)?;

        let input = UpdateDeviceRepoInput {
            device_id: request.device_id,
            mac: request.mac,
            name: request.name,
            device_type: request.device_type,
            home_id: request.home_id,
        };

        if !input.has_changes() {
            return Err(DomainError::NoFieldsToUpdate);
        }

        self.device_repository.update_device(input).await?;

        info!("Device updated successfully");
        Ok(())
    }

    #[instrument(skip(self, request), fields(device_id = %request.device_id))]
    pub async fn delete_device(&self, request: DeleteDeviceRequest) -> DomainResult<()> {
        common::garde::validate(&request)?;

        self.device_repository
            .delete_device(DeleteDeviceRepoInput {
                device_id: request.device_id,
            })
            .await?;

        info!("Device deleted successfully");
        Ok(())
    }
}
