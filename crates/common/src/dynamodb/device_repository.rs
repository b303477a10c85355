use crate::domain::{
    CreateDeviceRepoInput, DeleteDeviceRepoInput, Device, DeviceExistsRepoInput,
    DeviceRepository, DomainError, DomainResult, GetDeviceRepoInput, UpdateDeviceRepoInput,
};
use crate::dynamodb::config::DeviceTableConfig;
use crate::dynamodb::expression::{Condition, KeyCondition, UpdateExpression};
use crate::dynamodb::store::{
    DeleteItemRequest, GetItemRequest, Item, KeyValueStore, PutItemRequest, QueryRequest,
    StoreError, UpdateItemRequest,
};
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

pub const ATTR_ID: &str = "id";
pub const ATTR_MAC: &str = "mac";
pub const ATTR_NAME: &str = "name";
pub const ATTR_TYPE: &str = "type";
pub const ATTR_HOME_ID: &str = "homeId";
pub const ATTR_CREATED_AT: &str = "createdAt";
pub const ATTR_MODIFIED_AT: &str = "modifiedAt";

/// Device as laid out in the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceItem {
    pub id: String,
    pub mac: String,
    pub name: String,
    pub device_type: String,
    pub home_id: String,
    pub created_at: i64,
    pub modified_at: i64,
}

impl DeviceItem {
    pub fn into_item(self) -> Item {
        HashMap::from([
            (ATTR_ID.to_string(), AttributeValue::S(self.id)),
            (ATTR_MAC.to_string(), AttributeValue::S(self.mac)),
            (ATTR_NAME.to_string(), AttributeValue::S(self.name)),
            (ATTR_TYPE.to_string(), AttributeValue::S(self.device_type)),
            (ATTR_HOME_ID.to_string(), AttributeValue::S(self.home_id)),
            (
                ATTR_CREATED_AT.to_string(),
                AttributeValue::N(self.created_at.to_string()),
            ),
            (
                ATTR_MODIFIED_AT.to_string(),
                AttributeValue::N(self.modified_at.to_string()),
            ),
        ])
    }

    /// Missing or mistyped attributes read as empty strings and zero timestamps
    pub fn from_item(item: &Item) -> Self {
        Self {
            id: string_attribute(item, ATTR_ID),
            mac: string_attribute(item, ATTR_MAC),
            name: string_attribute(item, ATTR_NAME),
            device_type: string_attribute(item, ATTR_TYPE),
            home_id: string_attribute(item, ATTR_HOME_ID),
            created_at: number_attribute(item, ATTR_CREATED_AT),
            modified_at: number_attribute(item, ATTR_MODIFIED_AT),
        }
    }
}

/// Convert table DeviceItem to domain Device
impl From<DeviceItem> for Device {
    fn from(item: DeviceItem) -> Self {
        Device {
            device_id: item.id,
            mac: item.mac,
            name: item.name,
            device_type: item.device_type,
            home_id: item.home_id,
            created_at: item.created_at,
            modified_at: item.modified_at,
        }
    }
}

fn string_attribute(item: &Item, attribute: &str) -> String {
    item.get(attribute)
        .and_then(|value| value.as_s().ok())
        .cloned()
        .unwrap_or_default()
}

fn number_attribute(item: &Item, attribute: &str) -> i64 {
    item.get(attribute)
        .and_then(|value| value.as_n().ok())
        .and_then(|value| value.parse().ok())
        .unwrap_or_default()
}

fn id_key(device_id: &str) -> Item {
    HashMap::from([(
        ATTR_ID.to_string(),
        AttributeValue::S(device_id.to_string()),
    )])
}

fn store_error(err: StoreError) -> anyhow::Error {
    match err {
        StoreError::Request(err) => err,
        StoreError::ConditionalCheckFailed => anyhow::anyhow!("conditional check failed"),
    }
}

/// `DeviceRepository` over a DynamoDB-shaped key-value store
#[derive(Clone)]
pub struct DynamoDbDeviceRepository {
    store: Arc<dyn KeyValueStore>,
    config: DeviceTableConfig,
}

impl DynamoDbDeviceRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, config: DeviceTableConfig) -> Self {
        Self { store, config }
    }
}

#[async_trait]
impl DeviceRepository for DynamoDbDeviceRepository {
    #[instrument(skip(self, input), fields(mac = %input.mac, home_id = %input.home_id))]
    async fn exists_by_mac_and_home(&self, input: DeviceExistsRepoInput) -> DomainResult<bool> {
        let table_name = self.config.table_name()?;
        let index_name = self.config.mac_home_id_index_name()?;

        let items = self
            .store
            .query(QueryRequest {
                table_name: table_name.to_string(),
                index_name: Some(index_name.to_string()),
                key_condition: KeyCondition::new()
                    .eq(ATTR_MAC, AttributeValue::S(input.mac))
                    .eq(ATTR_HOME_ID, AttributeValue::S(input.home_id)),
                limit: Some(1),
            })
            .await
            .map_err(|e| {
                warn!(error = %e, "failed to query devices by mac and homeId");
                DomainError::DeviceLookupFailed(store_error(e))
            })?;

        debug!(exists = !items.is_empty(), "checked device uniqueness");
        Ok(!items.is_empty())
    }

    #[instrument(skip(self, input), fields(mac = %input.mac, home_id = %input.home_id))]
    async fn create_device(&self, input: CreateDeviceRepoInput) -> DomainResult<Device> {
        let table_name = self.config.table_name()?;

        let now = Utc::now().timestamp();
        let device = DeviceItem {
            id: xid::new().to_string(),
            mac: input.mac,
            name: input.name,
            device_type: input.device_type,
            home_id: input.home_id,
            created_at: now,
            modified_at: now,
        };

        self.store
            .put(PutItemRequest {
                table_name: table_name.to_string(),
                item: device.clone().into_item(),
            })
            .await
            .map_err(|e| {
                warn!(error = %e, "failed to put device item");
                DomainError::DeviceCreateFailed(store_error(e))
            })?;

        info!(device_id = %device.id, "device created in table");
        Ok(device.into())
    }

    #[instrument(skip(self, input), fields(device_id = %input.device_id))]
    async fn get_device(&self, input: GetDeviceRepoInput) -> DomainResult<Device> {
        let table_name = self.config.table_name()?;

        let item = self
            .store
            .get(GetItemRequest {
                table_name: table_name.to_string(),
                key: id_key(&input.device_id),
            })
            .await
            .map_err(|e| {
                warn!(error = %e, "failed to get device item");
                DomainError::DeviceLookupFailed(store_error(e))
            })?
            .ok_or_else(|| DomainError::DeviceNotFound(input.device_id.clone()))?;

        Ok(DeviceItem::from_item(&item).into())
    }

    #[instrument(skip(self, input), fields(device_id = %input.device_id))]
    async fn update_device(&self, input: UpdateDeviceRepoInput) -> DomainResult<()> {
        let table_name = self.config.table_name()?;

        let update = UpdateExpression::new()
            .set(
                ATTR_MODIFIED_AT,
                AttributeValue::N(Utc::now().timestamp().to_string()),
            )
            .set_non_empty(ATTR_MAC, input.mac.as_deref())
            .set_non_empty(ATTR_NAME, input.name.as_deref())
            .set_non_empty(ATTR_TYPE, input.device_type.as_deref())
            .set_non_empty(ATTR_HOME_ID, input.home_id.as_deref());

        let result = self
            .store
            .update(UpdateItemRequest {
                table_name: table_name.to_string(),
                key: id_key(&input.device_id),
                update,
                condition: Some(Condition::AttributeExists(ATTR_ID.to_string())),
            })
            .await;

        match result {
            Ok(()) => {
                info!("device updated in table");
                Ok(())
            }
            Err(StoreError::ConditionalCheckFailed) => {
                debug!("device does not exist, update rejected");
                Err(DomainError::DeviceNotFound(input.device_id))
            }
            Err(StoreError::Request(e)) => {
                warn!(error = %e, "failed to update device item");
                Err(DomainError::DeviceUpdateFailed(e))
            }
        }
    }

    #[instrument(skip(self, input), fields(device_id = %input.device_id))]
    async fn delete_device(&self, input: DeleteDeviceRepoInput) -> DomainResult<()> {
        let table_name = self.config.table_name()?;

        let result = self
            .store
            .delete(DeleteItemRequest {
                table_name: table_name.to_string(),
                key: id_key(&input.device_id),
                condition: Some(Condition::AttributeExists(ATTR_ID.to_string())),
            })
            .await;

        match result {
            Ok(()) => {
                info!("device deleted from table");
                Ok(())
            }
            Err(StoreError::ConditionalCheckFailed) => {
                debug!("device does not exist, delete rejected");
                Err(DomainError::DeviceNotFound(input.device_id))
            }
            Err(StoreError::Request(e)) => {
                warn!(error = %e, "failed to delete device item");
                Err(DomainError::DeviceDeleteFailed(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamodb::{InMemoryStore, MockKeyValueStore};

    const TABLE: &str = "HomeDevices";
    const INDEX: &str = "MacHomeIdIndex";

    fn table_config() -> DeviceTableConfig {
        DeviceTableConfig::new(TABLE, INDEX)
    }

    fn in_memory_repository() -> (InMemoryStore, DynamoDbDeviceRepository) {
        let store = InMemoryStore::new().with_table(TABLE, ATTR_ID);
        let repository = DynamoDbDeviceRepository::new(Arc::new(store.clone()), table_config());
        (store, repository)
    }

    fn create_input() -> CreateDeviceRepoInput {
        CreateDeviceRepoInput {
            mac: "00:1A:2B:3C:4D:5E".to_string(),
            name: "Living Room Light".to_string(),
            device_type: "light".to_string(),
            home_id: "home12122".to_string(),
        }
    }

    #[test]
    fn test_device_item_round_trips_through_attributes() {
        let device = DeviceItem {
            id: "d1".to_string(),
            mac: "00:1A:2B:3C:4D:5E".to_string(),
            name: "Lamp".to_string(),
            device_type: "light".to_string(),
            home_id: "home12122".to_string(),
            created_at: 1_700_000_000,
            modified_at: 1_700_000_500,
        };
        assert_eq!(DeviceItem::from_item(&device.clone().into_item()), device);
    }

    #[test]
    fn test_device_item_tolerates_missing_attributes() {
        let item = HashMap::from([(ATTR_ID.to_string(), AttributeValue::S("d1".to_string()))]);
        let device = DeviceItem::from_item(&item);
        assert_eq!(device.id, "d1");
        assert_eq!(device.name, "");
        assert_eq!(device.created_at, 0);
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_equal_timestamps() {
        let (store, repository) = in_memory_repository();

        let device = repository.create_device(create_input()).await.unwrap();

        assert!(!device.device_id.is_empty());
        assert_eq!(device.created_at, device.modified_at);
        assert_eq!(store.items(TABLE).await.len(), 1);
    }

    #[tokio::test]
    async fn test_create_then_get_returns_equal_device() {
        let (_store, repository) = in_memory_repository();

        let created = repository.create_device(create_input()).await.unwrap();
        let fetched = repository
            .get_device(GetDeviceRepoInput {
                device_id: created.device_id.clone(),
            })
            .await
            .unwrap();

        assert_eq!(created, fetched);
    }

    #[tokio::test]
    async fn test_exists_by_mac_and_home() {
        let (_store, repository) = in_memory_repository();
        repository.create_device(create_input()).await.unwrap();

        let exists = |home_id: &str| DeviceExistsRepoInput {
            mac: "00:1A:2B:3C:4D:5E".to_string(),
            home_id: home_id.to_string(),
        };
        assert!(repository.exists_by_mac_and_home(exists("home12122")).await.unwrap());
        assert!(!repository.exists_by_mac_and_home(exists("home00000")).await.unwrap());
    }

    #[tokio::test]
    async fn test_get_missing_device_is_not_found() {
        let (_store, repository) = in_memory_repository();
        let result = repository
            .get_device(GetDeviceRepoInput {
                device_id: "missing".to_string(),
            })
            .await;
        assert!(matches!(result, Err(DomainError::DeviceNotFound(id)) if id == "missing"));
    }

    #[tokio::test]
    async fn test_update_changes_only_supplied_fields() {
        let (_store, repository) = in_memory_repository();
        let created = repository.create_device(create_input()).await.unwrap();

        repository
            .update_device(UpdateDeviceRepoInput {
                device_id: created.device_id.clone(),
                device_type: Some("alarm".to_string()),
                name: Some(String::new()),
                ..Default::default()
            })
            .await
            .unwrap();

        let updated = repository
            .get_device(GetDeviceRepoInput {
                device_id: created.device_id.clone(),
            })
            .await
            .unwrap();
        assert_eq!(updated.device_type, "alarm");
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.mac, created.mac);
        assert_eq!(updated.home_id, created.home_id);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.modified_at >= created.modified_at);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_device_are_not_found() {
        let (store, repository) = in_memory_repository();

        let update = repository
            .update_device(UpdateDeviceRepoInput {
                device_id: "missing".to_string(),
                name: Some("Lamp".to_string()),
                ..Default::default()
            })
            .await;
        assert!(matches!(update, Err(DomainError::DeviceNotFound(_))));
        assert!(store.items(TABLE).await.is_empty());

        let delete = repository
            .delete_device(DeleteDeviceRepoInput {
                device_id: "missing".to_string(),
            })
            .await;
        assert!(matches!(delete, Err(DomainError::DeviceNotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let (_store, repository) = in_memory_repository();
        let created = repository.create_device(create_input()).await.unwrap();

        repository
            .delete_device(DeleteDeviceRepoInput {
                device_id: created.device_id.clone(),
            })
            .await
            .unwrap();

        let result = repository
            .get_device(GetDeviceRepoInput {
                device_id: created.device_id,
            })
            .await;
        assert!(matches!(result, Err(DomainError::DeviceNotFound(_))));
    }

    #[tokio::test]
    async fn test_update_builds_conditional_expression() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_update()
            .withf(|request: &UpdateItemRequest| {
                let rendered = request.update.render();
                request.table_name == TABLE
                    && request.key == id_key("d1")
                    && request.condition == Some(Condition::AttributeExists("id".to_string()))
                    && rendered.expression == "SET #modifiedAt = :modifiedAt, #mac = :mac, #homeId = :homeId"
            })
            .times(1)
            .return_once(|_| Ok(()));

        let repository = DynamoDbDeviceRepository::new(Arc::new(store), table_config());
        repository
            .update_device(UpdateDeviceRepoInput {
                device_id: "d1".to_string(),
                mac: Some("00:1A:2B:3C:4D:5E".to_string()),
                home_id: Some("home12122".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_store_failures_are_classified_per_operation() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_query()
            .return_once(|_| Err(StoreError::Request(anyhow::anyhow!("throttled"))));
        store
            .expect_put()
            .return_once(|_| Err(StoreError::Request(anyhow::anyhow!("throttled"))));
        store
            .expect_get()
            .return_once(|_| Err(StoreError::Request(anyhow::anyhow!("throttled"))));
        store
            .expect_update()
            .return_once(|_| Err(StoreError::Request(anyhow::anyhow!("throttled"))));
        store
            .expect_delete()
            .return_once(|_| Err(StoreError::Request(anyhow::anyhow!("throttled"))));

        let repository = DynamoDbDeviceRepository::new(Arc::new(store), table_config());

        let exists = repository
            .exists_by_mac_and_home(DeviceExistsRepoInput {
                mac: "00:1A:2B:3C:4D:5E".to_string(),
                home_id: "home12122".to_string(),
            })
            .await;
        assert!(matches!(exists, Err(DomainError::DeviceLookupFailed(_))));

        let create = repository.create_device(create_input()).await;
        assert!(matches!(create, Err(DomainError::DeviceCreateFailed(_))));

        let get = repository
            .get_device(GetDeviceRepoInput {
                device_id: "d1".to_string(),
            })
            .await;
        assert!(matches!(get, Err(DomainError::DeviceLookupFailed(_))));

        let update = repository
            .update_device(UpdateDeviceRepoInput {
                device_id: "d1".to_string(),
                name: Some("Lamp".to_string()),
                ..Default::default()
            })
            .await;
        assert!(matches!(update, Err(DomainError::DeviceUpdateFailed(_))));

        let delete = repository
            .delete_device(DeleteDeviceRepoInput {
                device_id: "d1".to_string(),
            })
            .await;
        assert!(matches!(delete, Err(DomainError::DeviceDeleteFailed(_))));
    }

    #[tokio::test]
    async fn test_missing_table_name_is_configuration_error() {
        let store = MockKeyValueStore::new();
        let repository = DynamoDbDeviceRepository::new(
            Arc::new(store),
            DeviceTableConfig {
                table_name: None,
                mac_home_id_index_name: Some(INDEX.to_string()),
            },
        );

        let result = repository.create_device(create_input()).await;
        assert!(matches!(
            result,
            Err(DomainError::ConfigurationMissing(name)) if name == "HOME_DEVICE_TABLE_NAME"
        ));
    }
}
