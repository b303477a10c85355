use crate::dynamodb::expression::Condition;
use crate::dynamodb::store::{
    DeleteItemRequest, GetItemRequest, Item, KeyValueStore, PutItemRequest, QueryRequest,
    StoreError, UpdateItemRequest,
};
use anyhow::anyhow;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory `KeyValueStore` with DynamoDB-like conditional write semantics
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    /// Table name to partition key attribute
    partition_keys: HashMap<String, String>,
    items: Arc<RwLock<HashMap<String, Vec<Item>>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table keyed by a single partition attribute
    pub fn with_table(mut self, table_name: &str, partition_key: &str) -> Self {
        self.partition_keys
            .insert(table_name.to_string(), partition_key.to_string());
        self
    }

    /// Snapshot of every item stored in `table_name`
    pub async fn items(&self, table_name: &str) -> Vec<Item> {
        let items = self.items.read().await;
        items.get(table_name).cloned().unwrap_or_default()
    }

    fn partition_key(&self, table_name: &str) -> Result<&str, StoreError> {
        self.partition_keys
            .get(table_name)
            .map(String::as_str)
            .ok_or_else(|| table_not_found(table_name))
    }
}

fn position(items: &[Item], partition_key: &str, key: &Item) -> Option<usize> {
    let wanted = key.get(partition_key)?;
    items
        .iter()
        .position(|item| item.get(partition_key) == Some(wanted))
}

fn table_not_found(table_name: &str) -> StoreError {
    StoreError::Request(anyhow!("Requested resource not found: table {}", table_name))
}

fn condition_holds(condition: Option<&Condition>, existing: Option<&Item>) -> bool {
    match condition {
        None => true,
        Some(Condition::AttributeExists(attribute)) => {
            existing.is_some_and(|item| item.contains_key(attribute))
        }
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn put(&self, request: PutItemRequest) -> Result<(), StoreError> {
        let partition_key = self.partition_key(&request.table_name)?;
        if !request.item.contains_key(partition_key) {
            return Err(StoreError::Request(anyhow!(
                "item is missing partition key {}",
                partition_key
            )));
        }

        let mut tables = self.items.write().await;
        let items = tables.entry(request.table_name).or_default();
        match position(items, partition_key, &request.item) {
            Some(index) => items[index] = request.item,
            None => items.push(request.item),
        }
        Ok(())
    }

    async fn get(&self, request: GetItemRequest) -> Result<Option<Item>, StoreError> {
        let partition_key = self.partition_key(&request.table_name)?;
        let tables = self.items.read().await;
        let items = tables
            .get(&request.table_name)
            .map(Vec::as_slice)
            .unwrap_or_default();

        Ok(position(items, partition_key, &request.key).map(|index| items[index].clone()))
    }

    async fn update(&self, request: UpdateItemRequest) -> Result<(), StoreError> {
        let partition_key = self.partition_key(&request.table_name)?;
        let mut tables = self.items.write().await;
        let items = tables.entry(request.table_name).or_default();

        let found = position(items, partition_key, &request.key);
        if !condition_holds(request.condition.as_ref(), found.map(|index| &items[index])) {
            return Err(StoreError::ConditionalCheckFailed);
        }

        // Updating a missing item without a condition creates it, as DynamoDB does
        let index = match found {
            Some(index) => index,
            None => {
                items.push(request.key);
                items.len() - 1
            }
        };
        for (attribute, value) in request.update.assignments() {
            items[index].insert(attribute.clone(), value.clone());
        }
        Ok(())
    }

    async fn delete(&self, request: DeleteItemRequest) -> Result<(), StoreError> {
        let partition_key = self.partition_key(&request.table_name)?;
        let mut tables = self.items.write().await;
        let items = tables.entry(request.table_name).or_default();

        let found = position(items, partition_key, &request.key);
        if !condition_holds(request.condition.as_ref(), found.map(|index| &items[index])) {
            return Err(StoreError::ConditionalCheckFailed);
        }

        if let Some(index) = found {
            items.remove(index);
        }
        Ok(())
    }

    async fn query(&self, request: QueryRequest) -> Result<Vec<Item>, StoreError> {
        self.partition_key(&request.table_name)?;
        let tables = self.items.read().await;
        let limit = request
            .limit
            .and_then(|limit| usize::try_from(limit).ok())
            .unwrap_or(usize::MAX);

        Ok(tables
            .get(&request.table_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .filter(|item| request.key_condition.matches(item))
            .take(limit)
            .cloned()
            .collect())
    }
}
