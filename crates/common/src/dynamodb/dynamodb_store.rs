use crate::dynamodb::expression::RenderedExpression;
use crate::dynamodb::store::{
    DeleteItemRequest, GetItemRequest, Item, KeyValueStore, PutItemRequest, QueryRequest,
    StoreError, UpdateItemRequest,
};
use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use std::collections::HashMap;
use tracing::debug;

/// `KeyValueStore` backed by Amazon DynamoDB
#[derive(Clone)]
pub struct DynamoDbStore {
    client: Client,
}

impl DynamoDbStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl std::fmt::Debug for DynamoDbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamoDbStore").finish_non_exhaustive()
    }
}

fn is_update_conditional_check_failed<R>(err: &SdkError<UpdateItemError, R>) -> bool {
    match err {
        SdkError::ServiceError(service_err) => {
            matches!(
                service_err.err(),
                UpdateItemError::ConditionalCheckFailedException(_)
            )
        }
        _ => false,
    }
}

fn is_delete_conditional_check_failed<R>(err: &SdkError<DeleteItemError, R>) -> bool {
    match err {
        SdkError::ServiceError(service_err) => {
            matches!(
                service_err.err(),
                DeleteItemError::ConditionalCheckFailedException(_)
            )
        }
        _ => false,
    }
}

/// DynamoDB rejects empty placeholder maps, so only pass them when populated
fn placeholders(rendered: RenderedExpression) -> (Option<HashMap<String, String>>, Option<Item>) {
    let names = (!rendered.names.is_empty()).then_some(rendered.names);
    let values = (!rendered.values.is_empty()).then_some(rendered.values);
    (names, values)
}

#[async_trait]
impl KeyValueStore for DynamoDbStore {
    async fn put(&self, request: PutItemRequest) -> Result<(), StoreError> {
        debug!(table = %request.table_name, "PutItem");

        self.client
            .put_item()
            .table_name(request.table_name)
            .set_item(Some(request.item))
            .send()
            .await
            .map_err(|e| StoreError::Request(e.into()))?;

        Ok(())
    }

    async fn get(&self, request: GetItemRequest) -> Result<Option<Item>, StoreError> {
        debug!(table = %request.table_name, "GetItem");

        let output = self
            .client
            .get_item()
            .table_name(request.table_name)
            .set_key(Some(request.key))
            .send()
            .await
            .map_err(|e| StoreError::Request(e.into()))?;

        Ok(output.item().cloned())
    }

    async fn update(&self, request: UpdateItemRequest) -> Result<(), StoreError> {
        debug!(table = %request.table_name, "UpdateItem");

        let mut rendered = request.update.render();
        let condition_expression = request.condition.map(|condition| {
            let condition = condition.render();
            let expression = condition.expression.clone();
            rendered.absorb_placeholders(condition);
            expression
        });
        let update_expression = rendered.expression.clone();
        let (names, values) = placeholders(rendered);

        let result = self
            .client
            .update_item()
            .table_name(request.table_name)
            .set_key(Some(request.key))
            .update_expression(update_expression)
            .set_condition_expression(condition_expression)
            .set_expression_attribute_names(names)
            .set_expression_attribute_values(values)
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_update_conditional_check_failed(&e) => {
                Err(StoreError::ConditionalCheckFailed)
            }
            Err(e) => Err(StoreError::Request(e.into())),
        }
    }

    async fn delete(&self, request: DeleteItemRequest) -> Result<(), StoreError> {
        debug!(table = %request.table_name, "DeleteItem");

        let (condition_expression, names, values) = match request.condition {
            Some(condition) => {
                let rendered = condition.render();
                let expression = rendered.expression.clone();
                let (names, values) = placeholders(rendered);
                (Some(expression), names, values)
            }
            None => (None, None, None),
        };

        let result = self
            .client
            .delete_item()
            .table_name(request.table_name)
            .set_key(Some(request.key))
            .set_condition_expression(condition_expression)
            .set_expression_attribute_names(names)
            .set_expression_attribute_values(values)
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_delete_conditional_check_failed(&e) => {
                Err(StoreError::ConditionalCheckFailed)
            }
            Err(e) => Err(StoreError::Request(e.into())),
        }
    }

    async fn query(&self, request: QueryRequest) -> Result<Vec<Item>, StoreError> {
        debug!(
            table = %request.table_name,
            index = ?request.index_name,
            "Query"
        );

        let rendered = request.key_condition.render();
        let key_condition_expression = rendered.expression.clone();
        let (names, values) = placeholders(rendered);

        let output = self
            .client
            .query()
            .table_name(request.table_name)
            .set_index_name(request.index_name)
            .key_condition_expression(key_condition_expression)
            .set_expression_attribute_names(names)
            .set_expression_attribute_values(values)
            .set_limit(request.limit)
            .send()
            .await
            .map_err(|e| StoreError::Request(e.into()))?;

        Ok(output.items().to_vec())
    }
}
