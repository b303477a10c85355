use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation failed: {}", .0.join(", "))]
    ValidationError(Vec<String>),

    #[error("Device already exists for mac {mac} in home {home_id}")]
    DeviceAlreadyExists { mac: String, home_id: String },

    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("No fields supplied to update")]
    NoFieldsToUpdate,

    #[error("Device lookup failed: {0}")]
    DeviceLookupFailed(#[source] anyhow::Error),

    #[error("Device create failed: {0}")]
    DeviceCreateFailed(#[source] anyhow::Error),

    #[error("Device update failed: {0}")]
    DeviceUpdateFailed(#[source] anyhow::Error),

    #[error("Device delete failed: {0}")]
    DeviceDeleteFailed(#[source] anyhow::Error),

    #[error("Missing configuration value: {0}")]
    ConfigurationMissing(String),
}
