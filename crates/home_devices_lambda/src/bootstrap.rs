use crate::config::ServiceConfig;
use common::dynamodb::{DynamoDbDeviceRepository, DynamoDbStore, connect_dynamodb};
use common::telemetry::{TelemetryConfig, init_telemetry};
use home_devices_api::DeviceService;
use std::sync::Arc;
use tracing::info;

/// Load configuration from the environment.
///
/// Malformed configuration is fatal for a cold start, so the process exits.
pub fn load_config() -> ServiceConfig {
    match ServiceConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    }
}

/// Shared cold-start setup for every function: logging, the DynamoDB client
/// and the device service wired on top of it.
pub async fn bootstrap(service_name: &str) -> anyhow::Result<Arc<DeviceService>> {
    let config = load_config();

    init_telemetry(&TelemetryConfig {
        service_name: service_name.to_string(),
        log_level: config.log_level.clone(),
    })?;

    let client = connect_dynamodb(&config.dynamodb_client_config()).await;
    let store = Arc::new(DynamoDbStore::new(client));
    let device_repository = Arc::new(DynamoDbDeviceRepository::new(
        store,
        config.device_table_config(),
    ));

    info!(
        table = config.home_device_table_name.as_deref().unwrap_or_default(),
        index = config.mac_homeid_index_name.as_deref().unwrap_or_default(),
        "device service ready"
    );

    Ok(Arc::new(DeviceService::new(device_repository)))
}
