use aws_lambda_events::event::sqs::SqsEvent;
use home_devices_api::HomeDeviceListener;
use home_devices_lambda::bootstrap::bootstrap;
use home_devices_lambda::listener::handle_queue_event;
use lambda_runtime::{Error, LambdaEvent, run, service_fn};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let domain_service = bootstrap("home-device-listener").await?;
    let listener = HomeDeviceListener::new(domain_service);

    run(service_fn(|event: LambdaEvent<SqsEvent>| {
        handle_queue_event(&listener, event)
    }))
    .await
}
