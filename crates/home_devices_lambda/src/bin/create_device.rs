use home_devices_api::DeviceHandler;
use home_devices_lambda::bootstrap::bootstrap;
use home_devices_lambda::http::create_device;
use lambda_http::{Error, Request, run, service_fn};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let domain_service = bootstrap("create-device").await?;
    let handler = DeviceHandler::new(domain_service);

    run(service_fn(|request: Request| create_device(&handler, request))).await
}
