use common::dynamodb::{DeviceTableConfig, DynamoDbClientConfig};
use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServiceConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    // DynamoDB configuration
    /// Device table name; operations fail with a configuration error when unset
    #[serde(default)]
    pub home_device_table_name: Option<String>,

    /// Secondary index on (mac, homeId)
    #[serde(default)]
    pub mac_homeid_index_name: Option<String>,

    /// Endpoint override for DynamoDB Local
    #[serde(default)]
    pub dynamodb_endpoint_url: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ServiceConfig {
    /// Variable names are used as-is, e.g. `HOME_DEVICE_TABLE_NAME`, `LOG_LEVEL`
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::default().try_parsing(false))
            .build()?
            .try_deserialize()
    }

    pub fn device_table_config(&self) -> DeviceTableConfig {
        DeviceTableConfig {
            table_name: self.home_device_table_name.clone(),
            mac_home_id_index_name: self.mac_homeid_index_name.clone(),
        }
    }

    pub fn dynamodb_client_config(&self) -> DynamoDbClientConfig {
        DynamoDbClientConfig {
            endpoint_url: self.dynamodb_endpoint_url.clone(),
        }
    }
}
