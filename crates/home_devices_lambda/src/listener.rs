use crate::deadline::{deadline_from_millis, run_until_deadline};
use aws_lambda_events::event::sqs::SqsEvent;
use home_devices_api::HomeDeviceListener;
use lambda_runtime::{Error, LambdaEvent};
use tracing::warn;

/// Entry point for SQS batches.
///
/// Per-message failures never fail the invocation. A batch cut short by the
/// invocation deadline is logged and reported as handled.
pub async fn handle_queue_event(
    listener: &HomeDeviceListener,
    event: LambdaEvent<SqsEvent>,
) -> Result<(), Error> {
    let (payload, context) = event.into_parts();
    let records = payload.records.len();
    let deadline = deadline_from_millis(context.deadline);

    if run_until_deadline(deadline, listener.handle_event(payload))
        .await
        .is_none()
    {
        warn!(
            request_id = %context.request_id,
            records,
            "invocation deadline reached, remaining messages skipped"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_lambda_events::event::sqs::SqsMessage;
    use common::dynamodb::{DeviceTableConfig, DynamoDbDeviceRepository, InMemoryStore};
    use common::{CreateDeviceRepoInput, Device, DeviceRepository, GetDeviceRepoInput};
    use home_devices_api::DeviceService;
    use lambda_runtime::Context;
    use std::sync::Arc;

    fn message(body: &str) -> SqsMessage {
        SqsMessage {
            body: Some(body.to_string()),
            ..Default::default()
        }
    }

    async fn seeded() -> (Arc<DynamoDbDeviceRepository>, Device) {
        let store = Arc::new(InMemoryStore::default().with_table("HomeDevices", "id"));
        let repository = Arc::new(DynamoDbDeviceRepository::new(
            store,
            DeviceTableConfig::new("HomeDevices", "MacHomeIdIndex"),
        ));
        let device = repository
            .create_device(CreateDeviceRepoInput {
                mac: "AA:BB:CC:DD:EE:FF".to_string(),
                name: "Kitchen".to_string(),
                device_type: "sensor".to_string(),
                home_id: "home-1".to_string(),
            })
            .await
            .unwrap();
        (repository, device)
    }

    #[tokio::test]
    async fn test_batch_with_bad_message_still_succeeds() {
        let (repository, device) = seeded().await;
        let listener =
            HomeDeviceListener::new(Arc::new(DeviceService::new(repository.clone())));

        let event = SqsEvent {
            records: vec![
                message("not json"),
                message(&format!(r#"{{"id":"{}","homeId":"home-2"}}"#, device.device_id)),
            ],
        };

        handle_queue_event(&listener, LambdaEvent::new(event, Context::default()))
            .await
            .unwrap();

        let moved = repository
            .get_device(GetDeviceRepoInput {
                device_id: device.device_id.clone(),
            })
            .await
            .unwrap();
        assert_eq!(moved.home_id, "home-2");
    }
}
