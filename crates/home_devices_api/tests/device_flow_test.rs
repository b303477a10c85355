use aws_lambda_events::event::sqs::{SqsEvent, SqsMessage};
use common::dynamodb::{DeviceTableConfig, DynamoDbDeviceRepository, InMemoryStore};
use home_devices_api::domain::DeviceService;
use home_devices_api::lambda::{DeviceHandler, DeviceResponse, HomeDeviceListener};
use serde_json::json;
use std::sync::Arc;

const TABLE: &str = "HomeDevices";
const INDEX: &str = "MacHomeIdIndex";

fn device_service(config: DeviceTableConfig) -> Arc<DeviceService> {
    let store = InMemoryStore::new().with_table(TABLE, "id");
    let repository = DynamoDbDeviceRepository::new(Arc::new(store), config);
    Arc::new(DeviceService::new(Arc::new(repository)))
}

const LIVING_ROOM_LIGHT: &[u8] = br#"{
    "mac": "00:1A:2B:3C:4D:5E",
    "name": "Living Room Light",
    "type": "light",
    "homeId": "home12122"
}"#;

#[tokio::test]
async fn test_device_lifecycle() {
    let handler = DeviceHandler::new(device_service(DeviceTableConfig::new(TABLE, INDEX)));

    let created = handler.create(LIVING_ROOM_LIGHT).await;
    assert_eq!(created.status_code, 201);
    let device: DeviceResponse = serde_json::from_value(created.body).unwrap();
    assert!(!device.id.is_empty());
    assert_eq!(device.created_at, device.modified_at);

    let duplicate = handler.create(LIVING_ROOM_LIGHT).await;
    assert_eq!(duplicate.status_code, 400);
    assert_eq!(duplicate.body, json!({ "errors": ["Device Already Exist"] }));

    let fetched = handler.get(&device.id).await;
    assert_eq!(fetched.status_code, 200);
    let fetched: DeviceResponse = serde_json::from_value(fetched.body).unwrap();
    assert_eq!(fetched, device);

    let updated = handler.update(&device.id, br#"{"type":"alarm"}"#).await;
    assert_eq!(updated.status_code, 201);
    assert_eq!(updated.body, json!({ "message": "Device updated" }));

    let after_update: DeviceResponse =
        serde_json::from_value(handler.get(&device.id).await.body).unwrap();
    assert_eq!(after_update.device_type, "alarm");
    assert_eq!(after_update.name, device.name);
    assert_eq!(after_update.mac, device.mac);
    assert_eq!(after_update.home_id, device.home_id);
    assert_eq!(after_update.created_at, device.created_at);

    let deleted = handler.delete(&device.id).await;
    assert_eq!(deleted.status_code, 200);
    assert_eq!(deleted.body, json!({ "message": "Device deleted" }));

    let missing = handler.get(&device.id).await;
    assert_eq!(missing.status_code, 404);
    assert_eq!(missing.body, json!({ "errors": ["Device Not Found"] }));

    let delete_again = handler.delete(&device.id).await;
    assert_eq!(delete_again.status_code, 404);

    let update_missing = handler.update(&device.id, br#"{"name":"Lamp"}"#).await;
    assert_eq!(update_missing.status_code, 404);
}

#[tokio::test]
async fn test_same_mac_in_another_home_is_allowed() {
    let handler = DeviceHandler::new(device_service(DeviceTableConfig::new(TABLE, INDEX)));

    assert_eq!(handler.create(LIVING_ROOM_LIGHT).await.status_code, 201);

    let other_home = handler
        .create(br#"{"mac":"00:1A:2B:3C:4D:5E","name":"Porch Light","type":"light","homeId":"home99999"}"#)
        .await;
    assert_eq!(other_home.status_code, 201);
}

#[tokio::test]
async fn test_missing_configuration_is_internal_error() {
    let handler = DeviceHandler::new(device_service(DeviceTableConfig {
        table_name: Some(TABLE.to_string()),
        mac_home_id_index_name: None,
    }));

    let response = handler.create(LIVING_ROOM_LIGHT).await;
    assert_eq!(response.status_code, 500);
    assert_eq!(
        response.body,
        json!({ "errors": ["Internal Server error creating a new device"] })
    );
}

#[tokio::test]
async fn test_listener_moves_device_to_new_home() {
    let service = device_service(DeviceTableConfig::new(TABLE, INDEX));
    let handler = DeviceHandler::new(service.clone());
    let listener = HomeDeviceListener::new(service);

    let device: DeviceResponse =
        serde_json::from_value(handler.create(LIVING_ROOM_LIGHT).await.body).unwrap();

    let record = |body: String| SqsMessage {
        body: Some(body),
        ..Default::default()
    };
    let event = SqsEvent {
        records: vec![
            record(r#"{"id":"unknown-device","homeId":"home54321"}"#.to_string()),
            record(format!(r#"{{"id":"{}","homeId":"home54321"}}"#, device.id)),
        ],
    };

    let report = listener.handle_event(event).await;
    assert_eq!(report.updated, 1);
    assert_eq!(report.skipped, 1);

    let moved: DeviceResponse =
        serde_json::from_value(handler.get(&device.id).await.body).unwrap();
    assert_eq!(moved.home_id, "home54321");
    assert_eq!(moved.name, device.name);
}
