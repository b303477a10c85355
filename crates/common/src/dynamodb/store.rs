use crate::dynamodb::expression::{Condition, KeyCondition, UpdateExpression};
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use std::collections::HashMap;
use thiserror::Error;

/// A single stored record, keyed by attribute name
pub type Item = HashMap<String, AttributeValue>;

/// Unconditional write of a whole item
#[derive(Debug, Clone, PartialEq)]
pub struct PutItemRequest {
    pub table_name: String,
    pub item: Item,
}

/// Point lookup by primary key
#[derive(Debug, Clone, PartialEq)]
pub struct GetItemRequest {
    pub table_name: String,
    pub key: Item,
}

/// Partial update of the item addressed by `key`
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateItemRequest {
    pub table_name: String,
    pub key: Item,
    pub update: UpdateExpression,
    pub condition: Option<Condition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteItemRequest {
    pub table_name: String,
    pub key: Item,
    pub condition: Option<Condition>,
}

/// Equality query, optionally against a secondary index
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub table_name: String,
    pub index_name: Option<String>,
    pub key_condition: KeyCondition,
    pub limit: Option<i32>,
}

#[derive(Error, Debug)]
pub enum StoreError {
    /// The write's condition did not hold at write time
    #[error("conditional check failed")]
    ConditionalCheckFailed,

    #[error("store request failed: {0}")]
    Request(#[from] anyhow::Error),
}

/// Key-value store operations the device table needs
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn put(&self, request: PutItemRequest) -> Result<(), StoreError>;

    /// Returns `None` when no item has the given key
    async fn get(&self, request: GetItemRequest) -> Result<Option<Item>, StoreError>;

    async fn update(&self, request: UpdateItemRequest) -> Result<(), StoreError>;

    async fn delete(&self, request: DeleteItemRequest) -> Result<(), StoreError>;

    async fn query(&self, request: QueryRequest) -> Result<Vec<Item>, StoreError>;
}
