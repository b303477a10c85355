use crate::domain::{DomainError, DomainResult};

pub const HOME_DEVICE_TABLE_NAME: &str = "HOME_DEVICE_TABLE_NAME";
pub const MAC_HOMEID_INDEX_NAME: &str = "MAC_HOMEID_INDEX_NAME";

/// Names of the device table and its (mac, homeId) secondary index.
///
/// Both are resolved lazily: an operation that needs a missing name fails
/// with `DomainError::ConfigurationMissing` instead of the process refusing to start.
#[derive(Debug, Clone, Default)]
pub struct DeviceTableConfig {
    pub table_name: Option<String>,
    pub mac_home_id_index_name: Option<String>,
}

impl DeviceTableConfig {
    pub fn new(table_name: impl Into<String>, mac_home_id_index_name: impl Into<String>) -> Self {
        Self {
            table_name: Some(table_name.into()),
            mac_home_id_index_name: Some(mac_home_id_index_name.into()),
        }
    }

    pub fn table_name(&self) -> DomainResult<&str> {
        non_empty(self.table_name.as_deref(), HOME_DEVICE_TABLE_NAME)
    }

    pub fn mac_home_id_index_name(&self) -> DomainResult<&str> {
        non_empty(
            self.mac_home_id_index_name.as_deref(),
            MAC_HOMEID_INDEX_NAME,
        )
    }
}

fn non_empty<'a>(value: Option<&'a str>, variable: &str) -> DomainResult<&'a str> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(DomainError::ConfigurationMissing(variable.to_string())),
    }
}
