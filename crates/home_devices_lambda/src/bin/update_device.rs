use home_devices_api::DeviceHandler;
use home_devices_lambda::bootstrap::bootstrap;
use home_devices_lambda::http::update_device;
use lambda_http::{Error, Request, run, service_fn};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let domain_service = bootstrap("update-device").await?;
    let handler = DeviceHandler::new(domain_service);

    run(service_fn(|request: Request| update_device(&handler, request))).await
}
