use crate::domain::{
    CreateDeviceRequest, DeleteDeviceRequest, DeviceService, GetDeviceRequest,
    UpdateDeviceRequest,
};
use crate::lambda::response::{
    ApiResponse, DEVICE_DELETED_MESSAGE, DEVICE_UPDATED_MESSAGE, DeviceOperation,
    DeviceResponse, domain_error_to_response,
};
use serde::{Deserialize, Deserializer};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Body of `POST /v1/device`. Missing fields deserialize as empty strings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateDevicePayload {
    pub mac: String,
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: String,
    #[serde(rename = "homeId")]
    pub home_id: String,
}

/// Body of `PUT /v1/device/{id}`. Empty strings deserialize as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateDevicePayload {
    #[serde(deserialize_with = "empty_as_none")]
    pub mac: Option<String>,
    #[serde(deserialize_with = "empty_as_none")]
    pub name: Option<String>,
    #[serde(rename = "type", deserialize_with = "empty_as_none")]
    pub device_type: Option<String>,
    #[serde(rename = "homeId", deserialize_with = "empty_as_none")]
    pub home_id: Option<String>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|value| !value.is_empty()))
}

fn parse_body<'a, T: Deserialize<'a>>(body: &'a [u8]) -> Result<T, ApiResponse> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, "failed to deserialize request body");
        ApiResponse::error(400, &format!("Invalid request body: {}", e))
    })
}

/// Request handlers for the device routes.
/// Maps raw request parts to service requests and service results to responses.
pub struct DeviceHandler {
    domain_service: Arc<DeviceService>,
}

impl DeviceHandler {
    pub fn new(domain_service: Arc<DeviceService>) -> Self {
        Self { domain_service }
    }

    /// `POST /v1/device`
    #[instrument(name = "CreateDevice", skip(self, body))]
    pub async fn create(&self, body: &[u8]) -> ApiResponse {
        let payload: CreateDevicePayload = match parse_body(body) {
            Ok(payload) => payload,
            Err(response) => return response,
        };

        let request = CreateDeviceRequest {
            mac: payload.mac,
            name: payload.name,
            device_type: payload.device_type,
            home_id: payload.home_id,
        };

        match self.domain_service.create_device(request).await {
            Ok(device) => {
                debug!(device_id = %device.device_id, "create handled");
                ApiResponse::json(201, &DeviceResponse::from(device))
            }
            Err(e) => domain_error_to_response(e, DeviceOperation::Create),
        }
    }

    /// `GET /v1/device/{id}`
    #[instrument(name = "GetDevice", skip(self, device_id), fields(device_id = %device_id))]
    pub async fn get(&self, device_id: &str) -> ApiResponse {
        let request = GetDeviceRequest {
            device_id: device_id.to_string(),
        };

        match self.domain_service.get_device(request).await {
            Ok(device) => ApiResponse::json(200, &DeviceResponse::from(device)),
            Err(e) => domain_error_to_response(e, DeviceOperation::Get),
        }
    }

    /// `PUT /v1/device/{id}`
    #[instrument(name = "UpdateDevice", skip(self, device_id, body), fields(device_id = %device_id))]
    pub async fn update(&self, device_id: &str, body: &[u8]) -> ApiResponse {
        let payload: UpdateDevicePayload = match parse_body(body) {
            Ok(payload) => payload,
            Err(response) => return response,
        };

        let request = UpdateDeviceRequest {
            device_id: device_id.to_string(),
            mac: payload.mac,
            name: payload.name,
            device_type: payload.device_type,
            home_id: payload.home_id,
        };

        match self.domain_service.update_device(request).await {
            Ok(()) => ApiResponse::message(201, DEVICE_UPDATED_MESSAGE),
            Err(e) => domain_error_to_response(e, DeviceOperation::Update),
        }
    }

    /// `DELETE /v1/device/{id}`
    #[instrument(name = "DeleteDevice", skip(self, device_id), fields(device_id = %device_id))]
    pub async fn delete(&self, device_id: &str) -> ApiResponse {
        let request = DeleteDeviceRequest {
            device_id: device_id.to_string(),
        };

        match self.domain_service.delete_device(request).await {
            Ok(()) => ApiResponse::message(200, DEVICE_DELETED_MESSAGE),
            Err(e) => domain_error_to_response(e, DeviceOperation::Delete),
        }
    }
}
