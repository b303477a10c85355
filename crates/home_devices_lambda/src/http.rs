use crate::deadline::{deadline_from_millis, run_until_deadline};
use home_devices_api::{ApiResponse, DeviceHandler, DeviceOperation};
use lambda_http::{Body, Error, Request, RequestExt, Response};
use std::future::Future;
use std::time::SystemTime;
use tracing::warn;

const DEVICE_ID_PARAMETER: &str = "id";

/// Render an `ApiResponse` as an API Gateway proxy response
pub fn to_lambda_response(response: ApiResponse) -> Result<Response<Body>, Error> {
    let body = response.body_string();
    Ok(Response::builder()
        .status(response.status_code)
        .header("Content-Type", "application/json")
        .body(Body::from(body))?)
}

/// The `{id}` path parameter; empty when the route did not supply one
pub fn path_device_id(request: &Request) -> String {
    request
        .path_parameters()
        .first(DEVICE_ID_PARAMETER)
        .unwrap_or_default()
        .to_string()
}

fn request_deadline(request: &Request) -> Option<SystemTime> {
    request
        .lambda_context_ref()
        .and_then(|context| deadline_from_millis(context.deadline))
}

async fn respond<F>(
    operation: DeviceOperation,
    deadline: Option<SystemTime>,
    future: F,
) -> Result<Response<Body>, Error>
where
    F: Future<Output = ApiResponse>,
{
    let response = match run_until_deadline(deadline, future).await {
        Some(response) => response,
        None => {
            warn!(?operation, "invocation deadline reached before the store answered");
            operation.internal_error()
        }
    };
    to_lambda_response(response)
}

/// `POST /v1/device`
pub async fn create_device(handler: &DeviceHandler, request: Request) -> Result<Response<Body>, Error> {
    let deadline = request_deadline(&request);
    respond(
        DeviceOperation::Create,
        deadline,
        handler.create(request.body().as_ref()),
    )
    .await
}

/// `GET /v1/device/{id}`
pub async fn get_device(handler: &DeviceHandler, request: Request) -> Result<Response<Body>, Error> {
    let deadline = request_deadline(&request);
    let device_id = path_device_id(&request);
    respond(DeviceOperation::Get, deadline, handler.get(&device_id)).await
}

/// `PUT /v1/device/{id}`
pub async fn update_device(handler: &DeviceHandler, request: Request) -> Result<Response<Body>, Error> {
    let deadline = request_deadline(&request);
    let device_id = path_device_id(&request);
    respond(
        DeviceOperation::Update,
        deadline,
        handler.update(&device_id, request.body().as_ref()),
    )
    .await
}

/// `DELETE /v1/device/{id}`
pub async fn delete_device(handler: &DeviceHandler, request: Request) -> Result<Response<Body>, Error> {
    let deadline = request_deadline(&request);
    let device_id = path_device_id(&request);
    respond(DeviceOperation::Delete, deadline, handler.delete(&device_id)).await
}
