use common::domain::{Device, DomainError};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, error};

pub const DEVICE_ALREADY_EXISTS_MESSAGE: &str = "Device Already Exist";
pub const DEVICE_NOT_FOUND_MESSAGE: &str = "Device Not Found";
pub const NO_FIELDS_TO_UPDATE_MESSAGE: &str = "Please enter a value property to update";
pub const DEVICE_UPDATED_MESSAGE: &str = "Device updated";
pub const DEVICE_DELETED_MESSAGE: &str = "Device deleted";
pub const INTERNAL_SERVER_ERROR_MESSAGE: &str = "Internal Server Error";

/// Device JSON as returned to API callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceResponse {
    pub id: String,
    pub mac: String,
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub home_id: String,
    pub created_at: i64,
    pub modified_at: i64,
}

impl From<Device> for DeviceResponse {
    fn from(device: Device) -> Self {
        Self {
            id: device.device_id,
            mac: device.mac,
            name: device.name,
            device_type: device.device_type,
            home_id: device.home_id,
            created_at: device.created_at,
            modified_at: device.modified_at,
        }
    }
}

/// Transport-neutral HTTP response: a status code and a JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status_code: u16,
    pub body: Value,
}

impl ApiResponse {
    /// Serialize `value` as the body, falling back to a generic 500 if that fails
    pub fn json<T: Serialize>(status_code: u16, value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(body) => Self { status_code, body },
            Err(e) => {
                error!(error = %e, "failed to serialize response body");
                Self::internal_server_error()
            }
        }
    }

    pub fn message(status_code: u16, message: &str) -> Self {
        Self {
            status_code,
            body: json!({ "message": message }),
        }
    }

    pub fn errors(status_code: u16, errors: Vec<String>) -> Self {
        Self {
            status_code,
            body: json!({ "errors": errors }),
        }
    }

    pub fn error(status_code: u16, message: &str) -> Self {
        Self::errors(status_code, vec![message.to_string()])
    }

    pub fn internal_server_error() -> Self {
        Self::error(500, INTERNAL_SERVER_ERROR_MESSAGE)
    }

    pub fn body_string(&self) -> String {
        self.body.to_string()
    }
}

/// Which handler produced a failure; selects the generic 500 message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceOperation {
    Create,
    Get,
    Update,
    Delete,
}

impl DeviceOperation {
    pub fn internal_error_message(self) -> &'static str {
        match self {
            DeviceOperation::Create => "Internal Server error creating a new device",
            DeviceOperation::Get => "Internal Server error getting the device",
            DeviceOperation::Update => "Internal Server error updating a device",
            DeviceOperation::Delete => "Internal Server error deleting a device",
        }
    }

    pub fn internal_error(self) -> ApiResponse {
        ApiResponse::error(500, self.internal_error_message())
    }
}

/// Convert a domain error into the response for `operation`
pub fn domain_error_to_response(error: DomainError, operation: DeviceOperation) -> ApiResponse {
    match error {
        DomainError::ValidationError(messages) => {
            debug!(?messages, "request failed validation");
            ApiResponse::errors(400, messages)
        }

        DomainError::DeviceAlreadyExists { .. } => {
            ApiResponse::error(400, DEVICE_ALREADY_EXISTS_MESSAGE)
        }

        DomainError::NoFieldsToUpdate => ApiResponse::error(400, NO_FIELDS_TO_UPDATE_MESSAGE),

        DomainError::DeviceNotFound(_) => ApiResponse::error(404, DEVICE_NOT_FOUND_MESSAGE),

        DomainError::DeviceLookupFailed(_)
        | DomainError::DeviceCreateFailed(_)
        | DomainError::DeviceUpdateFailed(_)
        | DomainError::DeviceDeleteFailed(_)
        | DomainError::ConfigurationMissing(_) => {
            error!(error = %error, ?operation, "device operation failed");
            operation.internal_error()
        }
    }
}
